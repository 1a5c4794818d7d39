use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Code space exhausted: gave up after {attempts} attempts at length {length}")]
    CapacityExhausted { attempts: u32, length: usize },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Upstream service error: {0}")]
    Upstream(String),
}

pub type Result<T> = std::result::Result<T, Error>;
