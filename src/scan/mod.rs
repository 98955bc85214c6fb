//! Config-driven file enumeration

pub mod enumerator;

pub use enumerator::enumerate_config_files;
