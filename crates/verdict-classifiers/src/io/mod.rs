//! Dataset input from local CSV files and remote URLs.
pub mod loader;
