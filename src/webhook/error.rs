use thiserror::Error;

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Webhook URL is not set")]
    MissingUrl,

    #[error("Webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Webhook returned HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

pub type Result<T> = std::result::Result<T, WebhookError>;
