//! Configuration loading
//!
//! Settings come from `update-packager.toml` / `.yml` at the project root
//! (or an explicit `--config` path) and fall back to the built-in defaults.

pub mod loader;

pub use loader::load_config;
