pub mod connectors;
pub mod error;
pub mod state;
