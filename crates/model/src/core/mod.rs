pub mod log_type;
pub mod timestamp;
pub mod window;
