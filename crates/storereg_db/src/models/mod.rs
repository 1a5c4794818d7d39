pub mod session;
pub mod submission;
pub mod unique_code;
pub mod user;

pub use session::Session;
pub use submission::{NewSubmission, Submission, SubmissionStatus};
pub use unique_code::{CodeState, UniqueCode};
pub use user::User;
