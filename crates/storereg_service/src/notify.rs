//! Outbound applicant email via a Brevo-compatible transactional API.
//! Dispatch is best-effort: a failure is the caller's to log, never to
//! propagate into the review workflow.

use serde::Serialize;

use storereg_core::{Error, Result};
use storereg_db::models::submission::Submission;

const DEFAULT_API_URL: &str = "https://api.brevo.com/v3/smtp/email";

#[derive(Clone)]
pub struct Notifier {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    sender_email: String,
    sender_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmailAddress {
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailBody {
    sender: EmailAddress,
    to: Vec<EmailAddress>,
    subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    html_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text_content: Option<String>,
}

impl Notifier {
    pub fn new(
        api_url: String,
        api_key: String,
        sender_email: String,
        sender_name: Option<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
            sender_email,
            sender_name,
        }
    }

    /// Reads `EMAIL_API_KEY` / `EMAIL_SENDER` (and optionally
    /// `EMAIL_API_URL`, `EMAIL_SENDER_NAME`). Returns `None` when not
    /// configured, which disables notifications rather than failing boot.
    pub fn from_env() -> Option<Self> {
        let api_key = non_empty_env("EMAIL_API_KEY")?;
        let sender_email = non_empty_env("EMAIL_SENDER")?;
        let api_url =
            non_empty_env("EMAIL_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let sender_name = non_empty_env("EMAIL_SENDER_NAME");

        Some(Self::new(api_url, api_key, sender_email, sender_name))
    }

    pub async fn send(
        &self,
        to_email: &str,
        to_name: Option<&str>,
        subject: &str,
        html: Option<String>,
        text: Option<String>,
    ) -> Result<()> {
        let body = SendEmailBody {
            sender: EmailAddress {
                email: self.sender_email.clone(),
                name: self.sender_name.clone(),
            },
            to: vec![EmailAddress {
                email: to_email.to_string(),
                name: to_name.map(|s| s.to_string()),
            }],
            subject: subject.to_string(),
            html_content: html,
            text_content: text,
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("api-key", &self.api_key)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("Email dispatch failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::Upstream(format!(
                "Email API returned status {}",
                response.status()
            )));
        }

        Ok(())
    }

    /// The one notification the review workflow sends: the submission was
    /// processed and its result video is available.
    pub async fn send_finished(&self, submission: &Submission) -> Result<()> {
        let video_url = submission.video_url.as_deref().unwrap_or("");
        let text = format!(
            "Hello {},\n\nYour store registration for \"{}\" has been processed.\nYour video is ready: {}\n",
            submission.name, submission.store_name, video_url
        );

        self.send(
            &submission.email,
            Some(&submission.name),
            "Your store registration is finished",
            None,
            Some(text),
        )
        .await
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
