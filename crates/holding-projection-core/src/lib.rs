pub mod accounting;
pub mod config;
pub mod entity;
pub mod error;
pub mod financing;
pub mod property;
pub mod treasury;
pub mod types;
pub mod validation;

pub use config::ProjectionConfig;
pub use error::ProjectionError;
pub use types::*;

/// Standard result type for all projection operations
pub type ProjectionResult<T> = Result<T, ProjectionError>;
