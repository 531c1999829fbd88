pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use errors::{RoadcallError, RoadcallResult, ValidationError};
