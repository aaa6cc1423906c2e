pub mod endpoint;
pub mod error;
pub mod file;
pub mod sink;
pub mod velocloud;
