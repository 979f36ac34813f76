//! gchat-reminder library - inline markdown reminders delivered to Google Chat
//!
//! Notes carry reminders as `<text>(gChat@YYYY-MM-DD HH:MM)`. The
//! [`service::ReminderService`] keeps the reminders of every document,
//! and on each tick posts a card to the configured webhook for every
//! reminder that has come due and was not notified before.

pub mod cli;
pub mod reminder;
pub mod schedule;
pub mod service;
pub mod settings;
pub mod vault;
pub mod webhook;
