use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use storereg_core::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "submission_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
    Finished,
    Rejected,
}

impl SubmissionStatus {
    pub const ALLOWED: &'static [&'static str] = &["pending", "finished", "rejected"];

    /// Parses an API-supplied status string. Administrators attempting
    /// anything outside the allowed set get the full list back.
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "pending" => Ok(Self::Pending),
            "finished" => Ok(Self::Finished),
            "rejected" => Ok(Self::Rejected),
            other => Err(Error::InvalidInput(format!(
                "Invalid status '{}'. Must be one of: {}",
                other,
                Self::ALLOWED.join(", ")
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Finished => "finished",
            Self::Rejected => "rejected",
        }
    }
}

/// An applicant's form entry awaiting administrative review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Submission {
    pub id: i64,
    pub name: String,
    pub store_name: String,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub status: SubmissionStatus,
    pub video_url: Option<String>,
    pub submission_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Applicant payload for the public form. Fields default to empty on
/// deserialization so a missing field surfaces as our own validation error
/// instead of a serde rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub store_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

impl NewSubmission {
    /// All five applicant fields are required. Presence only; email format
    /// is validated client-side.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("name", &self.name),
            ("store_name", &self.store_name),
            ("address", &self.address),
            ("email", &self.email),
            ("phone", &self.phone),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(Error::InvalidInput(format!("{field} is required")));
            }
        }
        Ok(())
    }
}
