pub mod models;
pub mod repository;
pub mod schema;

// Re-export common types for convenience
pub use repository::{CodeRepository, SessionRepository, SubmissionRepository, UserRepository};
