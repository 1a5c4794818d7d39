//! Submission creation (optionally code-gated) and the review workflow.

use storereg_core::{Error, Result};
use storereg_db::models::submission::{NewSubmission, Submission, SubmissionStatus};
use storereg_db::repository::{CodeRepository, SubmissionRepository};

use crate::RegistryService;

impl RegistryService {
    /// Creates a submission from the public form. When a code is supplied,
    /// the submission insert and the code redemption run in one transaction:
    /// a rejected or unknown code rolls the insert back, so a failed
    /// redemption never strands an orphaned submission row.
    pub async fn create_submission(
        &self,
        input: &NewSubmission,
        code: Option<&str>,
    ) -> Result<Submission> {
        input.validate()?;

        let Some(code) = code else {
            // Codeless deployments post the form directly.
            return SubmissionRepository::new(self.pool.clone()).create(input).await;
        };

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        // An early return before commit drops the transaction, which rolls
        // the insert back.
        let submission = SubmissionRepository::create_with(&mut *tx, input).await?;

        match CodeRepository::redeem_with(&mut *tx, code, submission.id).await? {
            Some(_) => {
                tx.commit()
                    .await
                    .map_err(|e| Error::Database(e.to_string()))?;
                Ok(submission)
            }
            None => {
                // Classify against the same transaction before discarding it.
                let exists = CodeRepository::exists_with(&mut *tx, code).await?;
                tx.rollback()
                    .await
                    .map_err(|e| Error::Database(e.to_string()))?;

                if exists {
                    Err(Error::Conflict(format!(
                        "Code '{code}' has already been used"
                    )))
                } else {
                    Err(Error::NotFound(format!("Code '{code}' does not exist")))
                }
            }
        }
    }

    pub async fn list_submissions(
        &self,
        status: Option<SubmissionStatus>,
    ) -> Result<Vec<Submission>> {
        SubmissionRepository::new(self.pool.clone()).list(status).await
    }

    pub async fn get_submission(&self, id: i64) -> Result<Submission> {
        SubmissionRepository::new(self.pool.clone())
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Submission {id} not found")))
    }

    pub async fn set_submission_status(
        &self,
        id: i64,
        status: SubmissionStatus,
    ) -> Result<Submission> {
        SubmissionRepository::new(self.pool.clone())
            .set_status(id, status)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Submission {id} not found")))
    }

    /// Attaches the artifact URL without touching the status. Pairs with
    /// [`Self::finish_with_video`] for the composed common case.
    pub async fn set_submission_video_url(&self, id: i64, video_url: &str) -> Result<Submission> {
        SubmissionRepository::new(self.pool.clone())
            .set_video_url(id, video_url)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Submission {id} not found")))
    }

    /// Status change and artifact attach in one update. The record either
    /// takes both values or, on failure, neither.
    pub async fn set_submission_status_and_video(
        &self,
        id: i64,
        status: SubmissionStatus,
        video_url: &str,
    ) -> Result<Submission> {
        SubmissionRepository::new(self.pool.clone())
            .set_status_and_video(id, status, video_url)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Submission {id} not found")))
    }

    /// Attaches the artifact and marks the submission finished in one
    /// update, then dispatches the applicant notification best-effort.
    pub async fn finish_with_video(&self, id: i64, video_url: &str) -> Result<Submission> {
        let submission = SubmissionRepository::new(self.pool.clone())
            .set_status_and_video(id, SubmissionStatus::Finished, video_url)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Submission {id} not found")))?;

        self.notify_finished(&submission);
        Ok(submission)
    }

    pub async fn delete_submission(&self, id: i64) -> Result<()> {
        let deleted = SubmissionRepository::new(self.pool.clone()).delete(id).await?;
        if deleted {
            Ok(())
        } else {
            Err(Error::NotFound(format!("Submission {id} not found")))
        }
    }

    /// Fire-and-forget applicant email. A delivery failure is logged and
    /// never rolls back the finished update that triggered it.
    fn notify_finished(&self, submission: &Submission) {
        let Some(notifier) = self.notifier.clone() else {
            return;
        };
        let submission = submission.clone();
        tokio::spawn(async move {
            if let Err(e) = notifier.send_finished(&submission).await {
                tracing::warn!(
                    submission_id = submission.id,
                    "failed to send finished notification: {e}"
                );
            }
        });
    }
}
