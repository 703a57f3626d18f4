//! Logging set up for the bootstrap binary.
pub mod logs;
pub mod tracing;
