pub mod archives;
pub mod global_logger;
