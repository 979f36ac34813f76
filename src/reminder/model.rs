//! Reminder data model

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of the canonical timestamp, e.g. `2024-01-01T09:00:00.000Z`
const ISO_LEN: usize = 24;

/// Format a due time the way identifiers, thread keys and card headers carry it
pub fn iso_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A reminder extracted from a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    /// Reminder text, trimmed and without a leading `- [ ]`
    pub content: String,

    /// When the reminder is due. `None` when the marker carried a timestamp
    /// that is not a real local date-time; such a reminder is never due.
    pub due: Option<DateTime<Utc>>,
}

impl Reminder {
    pub fn new(content: impl Into<String>, due: Option<DateTime<Utc>>) -> Self {
        Self {
            content: content.into(),
            due,
        }
    }

    /// Due when the due time is at or before `now`
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due.is_some_and(|due| due <= now)
    }

    /// Canonical ISO form of the due time
    pub fn due_iso(&self) -> Option<String> {
        self.due.as_ref().map(iso_timestamp)
    }

    /// Identifier recorded once this reminder has been notified
    pub fn id(&self) -> Option<ReminderId> {
        self.due.map(|due| ReminderId::new(&self.content, due))
    }
}

impl fmt::Display for Reminder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.due_iso() {
            Some(iso) => write!(f, "{} @ {}", self.content, iso),
            None => write!(f, "{} @ <invalid date>", self.content),
        }
    }
}

/// Notified-reminder identifier: `<content>-<iso due time>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReminderId(pub String);

impl ReminderId {
    pub fn new(content: &str, due: DateTime<Utc>) -> Self {
        Self(format!("{}-{}", content, iso_timestamp(&due)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Recover the due time from the fixed-width timestamp suffix.
    /// Returns `None` for identifiers written in another format.
    pub fn due_at(&self) -> Option<DateTime<Utc>> {
        let s = self.0.as_str();
        if s.len() < ISO_LEN + 1 {
            return None;
        }
        let split = s.len() - ISO_LEN;
        if !s.is_char_boundary(split) || !s[..split].ends_with('-') {
            return None;
        }
        DateTime::parse_from_rfc3339(&s[split..])
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

impl fmt::Display for ReminderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ReminderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
