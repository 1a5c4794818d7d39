use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Lifecycle of an access code. `Copied` is an administrative annotation
/// (staff copied the code to the clipboard) and never affects whether the
/// code can still be redeemed; `Used` is terminal and set only by the
/// redemption update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "code_state", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CodeState {
    Unused,
    Copied,
    Used,
}

/// A single-use access code gating the public submission form.
///
/// `submission_id` is a weak back-reference to the submission that consumed
/// the code. It is set exactly once, together with `used_at`, and may dangle
/// after that submission is hard-deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UniqueCode {
    pub id: i64,
    pub code: String,
    pub state: CodeState,
    pub created_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub submission_id: Option<i64>,
}

impl UniqueCode {
    /// A copied code is still redeemable; only `used` is terminal.
    pub fn is_redeemable(&self) -> bool {
        self.state != CodeState::Used
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn code_in(state: CodeState) -> UniqueCode {
        UniqueCode {
            id: 1,
            code: "ABCDEFGH".to_string(),
            state,
            created_at: Utc::now(),
            used_at: None,
            submission_id: None,
        }
    }

    #[test]
    fn copied_codes_remain_redeemable() {
        assert!(code_in(CodeState::Unused).is_redeemable());
        assert!(code_in(CodeState::Copied).is_redeemable());
        assert!(!code_in(CodeState::Used).is_redeemable());
    }

    #[test]
    fn state_serializes_lowercase() {
        let json = serde_json::to_string(&code_in(CodeState::Copied)).unwrap();
        assert!(json.contains("\"state\":\"copied\""));
    }
}
