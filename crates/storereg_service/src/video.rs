//! Result-video upload: raw bytes go to object storage under a UUID key,
//! and the durable URL is attached to the submission.

use aws_sdk_s3::primitives::ByteStream;
use uuid::Uuid;

use storereg_core::{Error, Result};
use storereg_db::models::submission::Submission;
use storereg_db::repository::SubmissionRepository;

use crate::RegistryService;

impl RegistryService {
    /// Uploads the video and runs the composed finish: the submission ends
    /// up `finished` with `video_url` pointing at the stored object.
    pub async fn upload_video(
        &self,
        submission_id: i64,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<Submission> {
        if bytes.is_empty() {
            return Err(Error::InvalidInput("video body is empty".to_string()));
        }

        // Reject unknown submissions before touching storage.
        SubmissionRepository::new(self.pool.clone())
            .get(submission_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Submission {submission_id} not found")))?;

        self.ensure_bucket().await?;

        let key = object_key(filename);
        self.s3
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(content_type_for(filename))
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("Video upload failed: {e}")))?;

        let url = format!(
            "{}/{}/{}",
            self.media_base_url.trim_end_matches('/'),
            self.bucket,
            key
        );

        self.finish_with_video(submission_id, &url).await
    }

    /// Self-healing storage init: create the bucket on first use instead of
    /// requiring provisioning to have run.
    pub(crate) async fn ensure_bucket(&self) -> Result<()> {
        if self
            .s3
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .is_ok()
        {
            return Ok(());
        }

        self.s3
            .create_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("Failed to create bucket: {e}")))?;

        Ok(())
    }
}

/// UUID key plus the original extension, so nothing about the applicant
/// leaks into the object name.
fn object_key(filename: &str) -> String {
    let id = Uuid::new_v4();
    match filename.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) => {
            format!("{id}.{}", ext.to_ascii_lowercase())
        }
        _ => id.to_string(),
    }
}

fn content_type_for(filename: &str) -> &'static str {
    match filename.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()) {
        Some(ext) if ext == "mp4" => "video/mp4",
        Some(ext) if ext == "webm" => "video/webm",
        Some(ext) if ext == "mov" => "video/quicktime",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_key_keeps_clean_extension() {
        let key = object_key("review.MP4");
        assert!(key.ends_with(".mp4"));
        assert!(!key.contains("review"));
    }

    #[test]
    fn object_key_drops_suspicious_extension() {
        assert!(!object_key("clip.mp4/../../etc").contains('/'));
        assert!(!object_key("noext").contains('.'));
    }

    #[test]
    fn content_types_cover_common_containers() {
        assert_eq!(content_type_for("a.mp4"), "video/mp4");
        assert_eq!(content_type_for("a.webm"), "video/webm");
        assert_eq!(content_type_for("a.bin"), "application/octet-stream");
    }
}
