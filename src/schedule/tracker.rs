//! Notified-reminder tracking

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::reminder::{Reminder, ReminderId};

/// Where a reminder stands relative to now and the notified set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReminderState {
    /// Due time is still in the future
    Pending,
    /// Due and not notified yet
    Due,
    /// Already notified
    Notified,
    /// Due longer ago than the retention window; never fires
    Expired,
    /// Marker timestamp could not be resolved; never fires
    Invalid,
}

impl ReminderState {
    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Pending => "⏳",
            Self::Due => "🔔",
            Self::Notified => "✅",
            Self::Expired => "💤",
            Self::Invalid => "❓",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Due => "due",
            Self::Notified => "notified",
            Self::Expired => "expired",
            Self::Invalid => "invalid",
        }
    }
}

/// Identifiers of every reminder that has been notified
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotifiedSet {
    ids: BTreeSet<ReminderId>,
}

impl NotifiedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &ReminderId) -> bool {
        self.ids.contains(id)
    }

    /// Record an identifier. Returns false if it was already present.
    pub fn insert(&mut self, id: ReminderId) -> bool {
        self.ids.insert(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReminderId> {
        self.ids.iter()
    }

    /// Add every identifier from `other`
    pub fn merge(&mut self, other: &NotifiedSet) {
        self.ids.extend(other.ids.iter().cloned());
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop identifiers whose due time is older than `retention` before `now`.
    /// Identifiers without a recoverable due time are kept. Returns the number
    /// of identifiers removed.
    pub fn prune(&mut self, now: DateTime<Utc>, retention: Duration) -> usize {
        let cutoff = now - retention;
        let before = self.ids.len();
        self.ids
            .retain(|id| id.due_at().map(|due| due >= cutoff).unwrap_or(true));
        before - self.ids.len()
    }

    /// Classify a reminder without recording anything
    pub fn state_of(
        &self,
        reminder: &Reminder,
        now: DateTime<Utc>,
        retention: Option<Duration>,
    ) -> ReminderState {
        let Some(id) = reminder.id() else {
            return ReminderState::Invalid;
        };
        if self.contains(&id) {
            ReminderState::Notified
        } else if retention.is_some_and(|keep| is_expired(reminder, now, keep)) {
            ReminderState::Expired
        } else if reminder.is_due(now) {
            ReminderState::Due
        } else {
            ReminderState::Pending
        }
    }
}

impl FromIterator<ReminderId> for NotifiedSet {
    fn from_iter<I: IntoIterator<Item = ReminderId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Decide whether `reminder` should be notified now.
///
/// Returns true at most once per identifier: the identifier is recorded in
/// `notified` when the reminder is due (`due <= now`) and not already there.
pub fn should_notify(reminder: &Reminder, notified: &mut NotifiedSet, now: DateTime<Utc>) -> bool {
    if !reminder.is_due(now) {
        return false;
    }
    match reminder.id() {
        Some(id) => notified.insert(id),
        None => false,
    }
}

impl Extend<ReminderId> for NotifiedSet {
    fn extend<I: IntoIterator<Item = ReminderId>>(&mut self, iter: I) {
        self.ids.extend(iter);
    }
}

/// True once the reminder's due time is older than `retention` before `now`,
/// the same cutoff [`NotifiedSet::prune`] applies. An expired reminder must
/// never be notified, otherwise pruning its identifier would re-fire it.
pub fn is_expired(reminder: &Reminder, now: DateTime<Utc>, retention: Duration) -> bool {
    reminder.due.is_some_and(|due| due < now - retention)
}
