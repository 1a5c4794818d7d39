use sqlx::{PgExecutor, PgPool};

use crate::models::submission::{NewSubmission, Submission, SubmissionStatus};
use storereg_core::{Error, Result};

pub struct SubmissionRepository {
    pool: PgPool,
}

impl SubmissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a submission in status `pending`. Takes an executor so the
    /// code-gated submit flow can run the insert inside the same
    /// transaction as the code redemption.
    pub async fn create_with(
        executor: impl PgExecutor<'_>,
        input: &NewSubmission,
    ) -> Result<Submission> {
        sqlx::query_as::<_, Submission>(
            r#"
            INSERT INTO submissions (name, store_name, address, email, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&input.name)
        .bind(&input.store_name)
        .bind(&input.address)
        .bind(&input.email)
        .bind(&input.phone)
        .fetch_one(executor)
        .await
        .map_err(|e| Error::Database(e.to_string()))
    }

    pub async fn create(&self, input: &NewSubmission) -> Result<Submission> {
        Self::create_with(&self.pool, input).await
    }

    /// Newest-first listing, optionally filtered to a single status.
    pub async fn list(&self, status: Option<SubmissionStatus>) -> Result<Vec<Submission>> {
        let rows = match status {
            Some(status) => {
                sqlx::query_as::<_, Submission>(
                    "SELECT * FROM submissions WHERE status = $1 ORDER BY submission_time DESC",
                )
                .bind(status)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, Submission>(
                    "SELECT * FROM submissions ORDER BY submission_time DESC",
                )
                .fetch_all(&self.pool)
                .await
            }
        };

        rows.map_err(|e| Error::Database(e.to_string()))
    }

    pub async fn get(&self, id: i64) -> Result<Option<Submission>> {
        sqlx::query_as::<_, Submission>("SELECT * FROM submissions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }

    /// Unconditional status overwrite. Any status is reachable from any
    /// other; administrators may revert a finished item back to pending.
    pub async fn set_status(
        &self,
        id: i64,
        status: SubmissionStatus,
    ) -> Result<Option<Submission>> {
        sqlx::query_as::<_, Submission>(
            r#"
            UPDATE submissions
            SET status = $1, updated_at = now()
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))
    }

    /// Artifact attach on its own; status is not touched.
    pub async fn set_video_url(&self, id: i64, video_url: &str) -> Result<Option<Submission>> {
        sqlx::query_as::<_, Submission>(
            r#"
            UPDATE submissions
            SET video_url = $1, updated_at = now()
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(video_url)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))
    }

    /// Attaches the artifact and sets the status in one UPDATE, so the two
    /// columns change together or not at all.
    pub async fn set_status_and_video(
        &self,
        id: i64,
        status: SubmissionStatus,
        video_url: &str,
    ) -> Result<Option<Submission>> {
        sqlx::query_as::<_, Submission>(
            r#"
            UPDATE submissions
            SET video_url = $1, status = $2, updated_at = now()
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(video_url)
        .bind(status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))
    }

    /// Hard delete. Any used code keeps its `submission_id` back-reference;
    /// clearing it would mutate a terminal code row, so the dangling weak
    /// reference is tolerated instead.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM submissions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
