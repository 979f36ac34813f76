//! Inline reminder extraction
//!
//! Reminders are written anywhere in a markdown note as
//! `<text>(gChat@YYYY-MM-DD HH:MM)`, optionally as an unchecked list item:
//!
//! ```text
//! - [ ] Pay rent (gChat@2024-01-01 09:00)
//! ```

pub mod model;
pub mod parser;

pub use model::{Reminder, ReminderId};
pub use parser::extract;
