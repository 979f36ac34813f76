//! Webhook HTTP client

use reqwest::header::CONTENT_TYPE;
use tracing::{debug, error, info, warn};

use super::error::{Result, WebhookError};
use super::payload::{CardStyle, ChatMessage};

/// Appended to the webhook URL so an unknown thread key starts a new thread
pub const REPLY_OPTION_QUERY: &str = "&messageReplyOption=REPLY_MESSAGE_FALLBACK_TO_NEW_THREAD";

/// Result of a single notification attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Sent,
    /// No webhook URL configured; nothing was sent
    Skipped,
    Failed,
}

pub struct WebhookClient {
    http: reqwest::Client,
    style: CardStyle,
}

impl WebhookClient {
    pub fn new(style: CardStyle) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("gchat-reminder/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, style })
    }

    pub fn style(&self) -> &CardStyle {
        &self.style
    }

    /// Post a due-reminder card for `content` to `webhook_url`.
    ///
    /// Never returns an error: a missing URL is reported as
    /// [`SendOutcome::Skipped`], transport and HTTP errors as
    /// [`SendOutcome::Failed`].
    pub async fn notify(&self, content: &str, due_iso: &str, webhook_url: &str) -> SendOutcome {
        match self.send(content, due_iso, webhook_url).await {
            Ok(()) => {
                info!("Sent reminder {:?} due {}", content, due_iso);
                SendOutcome::Sent
            }
            Err(WebhookError::MissingUrl) => {
                warn!("Webhook URL is not set. Notification for {:?} is not sent.", content);
                SendOutcome::Skipped
            }
            Err(e) => {
                error!("Error sending Google Chat notification for {:?}: {}", content, e);
                SendOutcome::Failed
            }
        }
    }

    async fn send(&self, content: &str, due_iso: &str, webhook_url: &str) -> Result<()> {
        let webhook_url = webhook_url.trim();
        if webhook_url.is_empty() {
            return Err(WebhookError::MissingUrl);
        }

        let message = ChatMessage::due_reminder(content, due_iso, &self.style);
        let url = format!("{}{}", webhook_url, REPLY_OPTION_QUERY);
        debug!("POST {}", webhook_url);

        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .json(&message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WebhookError::Status { status, body });
        }
        Ok(())
    }
}
