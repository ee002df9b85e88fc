//! Result Notifier
//!
//! Sends a segment result to the registered user through an EmailJS-style
//! REST endpoint. Failures never surface as errors: the caller always gets a
//! [`NotificationOutcome`] it can show as-is.

use std::time::Duration;

use serde_json::{json, Value};

use crate::domain::config::EmailConfig;
use crate::domain::segment::SegmentResult;
use crate::domain::user::UserProfile;
use crate::error::{Error, Result};

/// Shown when the public key is missing or still the placeholder
pub const NOT_CONFIGURED_MESSAGE: &str = "Email service is not configured. Please contact support.";

/// Shown when the send fails without a usable reason
pub const SEND_FAILED_MESSAGE: &str = "Failed to send email. Please try again later.";

/// Result of a send attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    Sent { message_id: String },
    Failed { error: String },
}

impl NotificationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, NotificationOutcome::Sent { .. })
    }
}

/// Posts result emails
#[derive(Debug, Clone)]
pub struct EmailNotifier {
    config: EmailConfig,
    client: reqwest::Client,
}

impl EmailNotifier {
    pub fn new(config: EmailConfig, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { config, client })
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Template variables for the result email
    pub fn template_params(user: &UserProfile, result: &SegmentResult) -> Value {
        json!({
            "to_name": user.full_name(),
            "to_email": user.email,
            "segment_number": result.segment,
            "segment_name": result.segment_name,
            "scores": result.scores_text(),
            "user_email": user.email,
            "first_name": user.first_name,
            "last_name": user.last_name,
        })
    }

    fn request_body(&self, user: &UserProfile, result: &SegmentResult) -> Value {
        json!({
            "service_id": self.config.service_id,
            "template_id": self.config.template_id,
            "user_id": self.config.public_key,
            "template_params": Self::template_params(user, result),
        })
    }

    async fn post(&self, body: &Value) -> Result<String> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .json(body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(Error::Network {
                status: Some(status.as_u16()),
                message: text,
            });
        }
        Ok(text)
    }

    /// Send the result email to `user`
    pub async fn send_results(&self, user: &UserProfile, result: &SegmentResult) -> NotificationOutcome {
        if !self.is_configured() {
            tracing::warn!("Email service is not configured, result not sent");
            return NotificationOutcome::Failed {
                error: NOT_CONFIGURED_MESSAGE.to_string(),
            };
        }

        match self.post(&self.request_body(user, result)).await {
            Ok(message_id) => {
                tracing::info!(to = %user.email, segment = result.segment, "Result email sent");
                NotificationOutcome::Sent { message_id }
            }
            Err(e) => {
                tracing::error!(error = %e, to = %user.email, "Failed to send result email");
                let error = match e {
                    Error::Network { message, .. } if !message.trim().is_empty() => message,
                    _ => SEND_FAILED_MESSAGE.to_string(),
                };
                NotificationOutcome::Failed { error }
            }
        }
    }
}

/// Plain-text body of the result email
pub fn generate_email_content(user: &UserProfile, result: &SegmentResult) -> String {
    let scores = result
        .numbered_scores()
        .map(|(n, score)| format!("  • Segment {n}: {score:.2}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Dear {first} {last},\n\n\
         Thank you for completing the CareStyles™ Patient Segment Identification.\n\n\
         Your Patient Segment: {name} (Segment {segment})\n\n\
         Segment Scores:\n{scores}\n\n\
         The segment with the highest score represents your predicted patient segment based on the CareStyles™ algorithm, which has an accuracy rate of 85.3%.\n\n\
         Best regards,\nCareStyles™ Team",
        first = user.first_name,
        last = user.last_name,
        name = result.segment_name,
        segment = result.segment,
    )
}
