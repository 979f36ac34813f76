//! Due tracking module
//!
//! Decides which reminders are due and remembers which ones have already
//! been notified, so each reminder fires exactly once.

pub mod tracker;

pub use tracker::{is_expired, should_notify, NotifiedSet, ReminderState};
