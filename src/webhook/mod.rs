//! Google Chat webhook delivery
//!
//! Builds the card message for a due reminder and posts it to the
//! configured incoming webhook. Delivery is fire-and-forget: failures are
//! logged and reported, never retried.

pub mod client;
pub mod error;
pub mod payload;

pub use client::{SendOutcome, WebhookClient, REPLY_OPTION_QUERY};
pub use error::WebhookError;
pub use payload::{CardStyle, ChatMessage};
