pub mod codegen;
pub mod error;

// Re-export specific items if needed
pub use error::{Error, Result};
