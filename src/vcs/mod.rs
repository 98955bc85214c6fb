//! Change collection from the version-control history.
//!
//! Read-only queries against the repository: files touched by commits in a
//! date range, and files with uncommitted working-tree changes. Repository
//! state is never mutated.

use chrono::{Days, NaiveDate, NaiveTime};
use git2::{Repository, StatusOptions};
use std::collections::BTreeSet;
use std::path::Path;

use crate::error::ExternalToolError;
use crate::utils::normalize_path;

pub struct ChangeCollector {
    repo: Repository,
}

impl ChangeCollector {
    /// Discover the repository at or above `root`.
    pub fn open(root: &Path) -> Result<Self, ExternalToolError> {
        let repo = Repository::discover(root)?;
        Ok(Self { repo })
    }

    /// Paths touched by non-merge commits whose timestamp falls in
    /// `[from 00:00, to 24:00)`, deduplicated and slash-normalized.
    pub fn changed_files(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<BTreeSet<String>, ExternalToolError> {
        let start_ts = from.and_time(NaiveTime::MIN).and_utc().timestamp();
        let end_ts = match to.checked_add_days(Days::new(1)) {
            Some(day_after) => day_after.and_time(NaiveTime::MIN).and_utc().timestamp(),
            None => i64::MAX,
        };

        let mut files = BTreeSet::new();

        let mut walk = self.repo.revwalk()?;
        walk.push_head()?;

        for oid in walk {
            let commit = self.repo.find_commit(oid?)?;
            if commit.parent_count() > 1 {
                continue;
            }
            let when = commit.time().seconds();
            if when < start_ts || when >= end_ts {
                continue;
            }

            let tree = commit.tree()?;
            let parent_tree = match commit.parent_count() {
                0 => None,
                _ => Some(commit.parent(0)?.tree()?),
            };
            let diff = self.repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;
            for delta in diff.deltas() {
                if let Some(path) = delta.new_file().path().and_then(|p| p.to_str()) {
                    files.insert(normalize_path(path));
                }
            }
        }

        Ok(files)
    }

    /// Working-tree paths with uncommitted changes, untracked files
    /// included, ignored files excluded.
    pub fn uncommitted_files(&self) -> Result<BTreeSet<String>, ExternalToolError> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true).recurse_untracked_dirs(true).exclude_submodules(true);

        let statuses = self.repo.statuses(Some(&mut opts))?;
        let mut files = BTreeSet::new();
        for entry in statuses.iter() {
            if let Some(path) = entry.path() {
                files.insert(normalize_path(path));
            }
        }
        Ok(files)
    }
}
