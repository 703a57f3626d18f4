pub mod binary_metadata;
pub mod channel;
pub mod threads;
