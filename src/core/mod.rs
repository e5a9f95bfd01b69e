pub mod config;
pub mod error;
pub mod types;
pub mod workflow_graph;

pub use error::AppError;
pub use types::*;
