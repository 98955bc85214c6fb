//! Table truncation with fail-safe foreign-key handling.
//!
//! Statements run through the [`SqlRunner`] seam so the re-enable ordering
//! is testable without a live server: whatever happens during truncation,
//! `FOREIGN_KEY_CHECKS=1` executes before control returns.

use anyhow::{Context, Result};
use mysql::prelude::Queryable;
use mysql::{Conn, OptsBuilder};

use crate::domain::DatabaseSettings;

/// Minimal statement executor the truncation flow needs.
pub trait SqlRunner {
    fn execute(&mut self, sql: &str) -> Result<()>;
    fn table_exists(&mut self, table: &str) -> Result<bool>;
}

/// Live MySQL connection.
pub struct MysqlRunner {
    conn: Conn,
}

impl MysqlRunner {
    pub fn connect(settings: &DatabaseSettings) -> Result<Self> {
        let opts = OptsBuilder::new()
            .ip_or_hostname(Some(settings.host.clone()))
            .tcp_port(settings.port)
            .user(Some(settings.username.clone()))
            .pass(Some(settings.password.clone()))
            .db_name(Some(settings.database.clone()));
        let conn = Conn::new(opts)
            .with_context(|| format!("connecting to {}:{}", settings.host, settings.port))?;
        Ok(Self { conn })
    }
}

impl SqlRunner for MysqlRunner {
    fn execute(&mut self, sql: &str) -> Result<()> {
        self.conn.query_drop(sql).with_context(|| format!("executing `{}`", sql))
    }

    fn table_exists(&mut self, table: &str) -> Result<bool> {
        let count: Option<u64> = self
            .conn
            .exec_first(
                "SELECT COUNT(*) FROM information_schema.tables \
                 WHERE table_schema = DATABASE() AND table_name = ?",
                (table,),
            )
            .with_context(|| format!("checking table {}", table))?;
        Ok(count.unwrap_or(0) > 0)
    }
}

/// Truncate every existing table in `tables`.
///
/// Foreign-key checks are disabled first and re-enabled before returning,
/// even when a truncation fails mid-loop. Missing tables are skipped with
/// a warning.
pub fn truncate_tables(runner: &mut dyn SqlRunner, tables: &[String]) -> Result<()> {
    runner.execute("SET FOREIGN_KEY_CHECKS=0")?;

    let outcome = truncate_each(runner, tables);
    let reenable = runner.execute("SET FOREIGN_KEY_CHECKS=1");

    // The truncation failure is the primary error; a re-enable failure
    // only surfaces when truncation itself succeeded.
    outcome?;
    reenable
}

fn truncate_each(runner: &mut dyn SqlRunner, tables: &[String]) -> Result<()> {
    for table in tables {
        if !runner.table_exists(table)? {
            tracing::warn!("Table {} does not exist, skipping truncation.", table);
            continue;
        }
        runner.execute(&format!("TRUNCATE TABLE `{}`", table))?;
        tracing::info!("Truncated table: {}", table);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every statement and fails on demand.
    struct StubRunner {
        statements: Vec<String>,
        missing: Vec<String>,
        fail_on: Option<String>,
    }

    impl StubRunner {
        fn new() -> Self {
            Self { statements: Vec::new(), missing: Vec::new(), fail_on: None }
        }
    }

    impl SqlRunner for StubRunner {
        fn execute(&mut self, sql: &str) -> Result<()> {
            self.statements.push(sql.to_string());
            if let Some(needle) = &self.fail_on {
                if sql.contains(needle.as_str()) {
                    anyhow::bail!("simulated failure on `{}`", sql);
                }
            }
            Ok(())
        }

        fn table_exists(&mut self, table: &str) -> Result<bool> {
            Ok(!self.missing.iter().any(|t| t == table))
        }
    }

    fn tables(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn truncates_each_existing_table_between_fk_toggles() {
        let mut runner = StubRunner::new();
        truncate_tables(&mut runner, &tables(&["sessions", "cache"])).expect("truncate");

        assert_eq!(
            runner.statements,
            vec![
                "SET FOREIGN_KEY_CHECKS=0",
                "TRUNCATE TABLE `sessions`",
                "TRUNCATE TABLE `cache`",
                "SET FOREIGN_KEY_CHECKS=1",
            ]
        );
    }

    #[test]
    fn missing_tables_are_skipped() {
        let mut runner = StubRunner::new();
        runner.missing.push("ghost".to_string());
        truncate_tables(&mut runner, &tables(&["ghost", "cache"])).expect("truncate");

        assert!(!runner.statements.iter().any(|s| s.contains("ghost")));
        assert!(runner.statements.iter().any(|s| s == "TRUNCATE TABLE `cache`"));
    }

    #[test]
    fn fk_checks_are_reenabled_when_truncation_fails() {
        let mut runner = StubRunner::new();
        runner.fail_on = Some("TRUNCATE TABLE `sessions`".to_string());

        let result = truncate_tables(&mut runner, &tables(&["sessions", "cache"]));

        assert!(result.is_err(), "truncation failure must propagate");
        assert_eq!(
            runner.statements.last().map(String::as_str),
            Some("SET FOREIGN_KEY_CHECKS=1"),
            "re-enable must run after the failure"
        );
        // The loop stops at the failing table.
        assert!(!runner.statements.iter().any(|s| s.contains("cache")));
    }
}
