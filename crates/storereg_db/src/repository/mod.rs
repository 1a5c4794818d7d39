pub mod codes;
pub mod submissions;
pub mod users;

pub use codes::{CodeFilter, CodeRepository};
pub use submissions::SubmissionRepository;
pub use users::{SessionRepository, UserRepository};
