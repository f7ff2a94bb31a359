pub mod analytics;
pub mod error;
pub mod health;
pub mod query;
pub mod root;

pub use error::ApiError;
