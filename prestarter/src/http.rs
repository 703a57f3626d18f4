//! # Helpers to build the blocking HTTP client used to download resources
pub mod client;
pub mod config;
