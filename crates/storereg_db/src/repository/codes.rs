use sqlx::{PgExecutor, PgPool};

use crate::models::unique_code::UniqueCode;
use storereg_core::{Error, Result};

/// Postgres unique-constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

/// Listing filter for the dashboard code table. "Unused" means
/// not-yet-redeemed, so copied codes are included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeFilter {
    Unused,
    Used,
}

pub struct CodeRepository {
    pool: PgPool,
}

impl CodeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persists a new code in state `unused`. The UNIQUE constraint on the
    /// code string is the last line of defense against concurrent issuance
    /// of the same candidate; violations surface as `Conflict`.
    pub async fn insert(&self, code: &str) -> Result<UniqueCode> {
        sqlx::query_as::<_, UniqueCode>(
            r#"
            INSERT INTO unique_codes (code)
            VALUES ($1)
            RETURNING *
            "#,
        )
        .bind(code)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::Conflict(format!("Code '{code}' already exists"))
            } else {
                Error::Database(e.to_string())
            }
        })
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Option<UniqueCode>> {
        sqlx::query_as::<_, UniqueCode>("SELECT * FROM unique_codes WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }

    pub async fn list(&self, filter: Option<CodeFilter>) -> Result<Vec<UniqueCode>> {
        let query = match filter {
            Some(CodeFilter::Unused) => {
                "SELECT * FROM unique_codes WHERE state <> 'used' ORDER BY created_at ASC"
            }
            Some(CodeFilter::Used) => {
                "SELECT * FROM unique_codes WHERE state = 'used' ORDER BY used_at DESC"
            }
            None => "SELECT * FROM unique_codes ORDER BY created_at DESC",
        };

        sqlx::query_as::<_, UniqueCode>(query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }

    /// The single authoritative `used` transition. The state predicate and
    /// the write are one statement, so of any number of concurrent
    /// redemptions of the same code exactly one can see a row to update.
    ///
    /// Returns `None` when no transition happened; the caller decides
    /// whether that means already-used or nonexistent (see [`Self::redeem`]).
    /// Takes an executor so the submit flow can run it inside its own
    /// transaction.
    pub async fn redeem_with(
        executor: impl PgExecutor<'_>,
        code: &str,
        submission_id: i64,
    ) -> Result<Option<UniqueCode>> {
        if code.trim().is_empty() {
            return Err(Error::InvalidInput("code is required".to_string()));
        }

        sqlx::query_as::<_, UniqueCode>(
            r#"
            UPDATE unique_codes
            SET state = 'used', used_at = now(), submission_id = $2
            WHERE code = $1 AND state <> 'used'
            RETURNING *
            "#,
        )
        .bind(code)
        .bind(submission_id)
        .fetch_optional(executor)
        .await
        .map_err(|e| Error::Database(e.to_string()))
    }

    /// Pool-level redeem that classifies a failed transition into
    /// `Conflict` (already used) or `NotFound`.
    pub async fn redeem(&self, code: &str, submission_id: i64) -> Result<UniqueCode> {
        match Self::redeem_with(&self.pool, code, submission_id).await? {
            Some(updated) => Ok(updated),
            None => match self.find_by_code(code).await? {
                Some(_) => Err(Error::Conflict(format!(
                    "Code '{code}' has already been used"
                ))),
                None => Err(Error::NotFound(format!("Code '{code}' does not exist"))),
            },
        }
    }

    pub async fn exists_with(executor: impl PgExecutor<'_>, code: &str) -> Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM unique_codes WHERE code = $1)")
            .bind(code)
            .fetch_one(executor)
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }

    /// Toggles the clipboard annotation. Used codes are left untouched so
    /// the redemption audit fields survive; the current row is returned
    /// unchanged in that case.
    pub async fn mark_copied(&self, code: &str, is_copied: bool) -> Result<UniqueCode> {
        let updated = sqlx::query_as::<_, UniqueCode>(
            r#"
            UPDATE unique_codes
            SET state = CASE WHEN $2 THEN 'copied'::code_state ELSE 'unused'::code_state END
            WHERE code = $1 AND state <> 'used'
            RETURNING *
            "#,
        )
        .bind(code)
        .bind(is_copied)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        match updated {
            Some(row) => Ok(row),
            None => self
                .find_by_code(code)
                .await?
                .ok_or_else(|| Error::NotFound(format!("Code '{code}' does not exist"))),
        }
    }

    /// Hard delete by code string. Returns whether a row was removed.
    pub async fn delete(&self, code: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM unique_codes WHERE code = $1")
            .bind(code)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == UNIQUE_VIOLATION)
}
