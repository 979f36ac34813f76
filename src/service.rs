//! Reminder service
//!
//! Holds the reminders found in each document and the notified state, and
//! exposes the two entry points driven by the daemon: a document changed,
//! and the periodic tick.

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::reminder::{extract, Reminder};
use crate::schedule::{is_expired, should_notify, NotifiedSet};
use crate::settings::{State, StateStore};
use crate::vault::Vault;
use crate::webhook::{SendOutcome, WebhookClient};

/// What a single tick did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Reminders that became due and were marked notified
    pub due: usize,
    pub sent: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Identifiers dropped by retention pruning
    pub pruned: usize,
}

/// Last state read from disk plus identifiers this process recorded but has
/// not managed to write yet
#[derive(Debug)]
struct Ledger {
    state: State,
    unsaved: NotifiedSet,
}

pub struct ReminderService {
    store: StateStore,
    ledger: Mutex<Ledger>,
    documents: Mutex<BTreeMap<PathBuf, Vec<Reminder>>>,
    client: WebhookClient,
    webhook_override: Option<String>,
    retention: Option<chrono::Duration>,
    dry_run: bool,
}

impl ReminderService {
    /// Create a service backed by `store`, loading the persisted state
    pub fn new(store: StateStore, client: WebhookClient) -> Result<Self> {
        let state = store.load()?;
        debug!(
            "Loaded {} notified reminders from {}",
            state.notified_tasks.len(),
            store.path().display()
        );

        Ok(Self {
            store,
            ledger: Mutex::new(Ledger {
                state,
                unsaved: NotifiedSet::new(),
            }),
            documents: Mutex::new(BTreeMap::new()),
            client,
            webhook_override: None,
            retention: None,
            dry_run: false,
        })
    }

    /// Use this URL instead of the stored one
    pub fn with_webhook_override(mut self, url: Option<String>) -> Self {
        self.webhook_override = url.filter(|u| !u.trim().is_empty());
        self
    }

    /// Forget notified identifiers this long after their due time. Reminders
    /// older than the window are expired and never notify.
    pub fn with_retention(mut self, retention: Option<chrono::Duration>) -> Self {
        self.retention = retention;
        self
    }

    /// Report due reminders without recording or sending anything
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Re-extract a document, replacing its previously cached reminders.
    /// Returns the number of reminders found.
    pub async fn on_document_changed(&self, path: &Path, text: &str) -> usize {
        let reminders = extract(text);
        let count = reminders.len();
        debug!("{}: {} reminders", path.display(), count);

        let mut documents = self.documents.lock().await;
        if reminders.is_empty() {
            documents.remove(path);
        } else {
            documents.insert(path.to_path_buf(), reminders);
        }
        count
    }

    /// Drop a deleted document's reminders
    pub async fn forget_document(&self, path: &Path) -> bool {
        self.documents.lock().await.remove(path).is_some()
    }

    /// Load every document of the vault. Unreadable documents are logged and
    /// skipped. Returns the total number of reminders cached.
    pub async fn scan_vault(&self, vault: &Vault) -> Result<usize> {
        let mut total = 0;
        for path in vault.documents()? {
            match vault.read(&path).await {
                Ok(text) => total += self.on_document_changed(&path, &text).await,
                Err(e) => warn!("Skipping document: {:#}", e),
            }
        }
        info!(
            "Scanned {}: {} reminders",
            vault.root().display(),
            total
        );
        Ok(total)
    }

    /// All cached reminders with the document they came from
    pub async fn reminders(&self) -> Vec<(PathBuf, Reminder)> {
        self.documents
            .lock()
            .await
            .iter()
            .flat_map(|(path, reminders)| reminders.iter().map(|r| (path.clone(), r.clone())))
            .collect()
    }

    pub async fn notified(&self) -> NotifiedSet {
        self.ledger.lock().await.state.notified_tasks.clone()
    }

    /// Notify every cached reminder that is due at `now` and has not been
    /// notified yet. Identifiers are persisted before any webhook is sent;
    /// failures are logged, never propagated.
    pub async fn on_tick(&self, now: DateTime<Utc>) -> TickReport {
        let mut report = TickReport::default();
        let retention = self.retention;
        let reminders: Vec<Reminder> = self
            .reminders()
            .await
            .into_iter()
            .map(|(_, reminder)| reminder)
            .filter(|r| !retention.is_some_and(|keep| is_expired(r, now, keep)))
            .collect();

        let mut guard = self.ledger.lock().await;
        let ledger = &mut *guard;
        self.refresh(ledger);

        let mut notified = ledger.state.notified_tasks.clone();
        let due: Vec<Reminder> = reminders
            .into_iter()
            .filter(|r| should_notify(r, &mut notified, now))
            .collect();
        report.due = due.len();

        if !self.dry_run {
            ledger.state.notified_tasks = notified;
            ledger.unsaved.extend(due.iter().filter_map(Reminder::id));
            if let Some(retention) = retention {
                report.pruned = ledger.state.notified_tasks.prune(now, retention);
            }
            if report.due > 0 || report.pruned > 0 {
                self.persist(ledger, now);
            }
        }

        let webhook_url = self
            .webhook_override
            .clone()
            .unwrap_or_else(|| ledger.state.webhook_url.clone());
        drop(guard);

        for reminder in due {
            let Some(due_iso) = reminder.due_iso() else {
                continue;
            };
            if self.dry_run {
                info!("Due (dry run): {:?} at {}", reminder.content, due_iso);
                continue;
            }
            match self.client.notify(&reminder.content, &due_iso, &webhook_url).await {
                SendOutcome::Sent => report.sent += 1,
                SendOutcome::Skipped => report.skipped += 1,
                SendOutcome::Failed => report.failed += 1,
            }
        }

        if report != TickReport::default() {
            info!(
                "Tick: {} due, {} sent, {} skipped, {} failed, {} pruned",
                report.due, report.sent, report.skipped, report.failed, report.pruned
            );
        }
        report
    }

    /// Adopt the state on disk so changes made by other processes (a new
    /// webhook URL, `notified clear`) take effect. Identifiers not yet written
    /// are kept on top.
    fn refresh(&self, ledger: &mut Ledger) {
        match self.store.load() {
            Ok(disk) => {
                ledger.state = disk;
                ledger.state.notified_tasks.merge(&ledger.unsaved);
            }
            Err(e) => warn!("Failed to reload state, using cached copy: {}", e),
        }
    }

    /// Add this process's new identifiers to whatever is on disk now
    fn persist(&self, ledger: &mut Ledger, now: DateTime<Utc>) {
        let unsaved = ledger.unsaved.clone();
        let retention = self.retention;
        let result = self.store.update(|disk| {
            disk.notified_tasks.merge(&unsaved);
            if let Some(retention) = retention {
                disk.notified_tasks.prune(now, retention);
            }
        });

        match result {
            Ok(written) => {
                ledger.state = written;
                ledger.unsaved.clear();
            }
            Err(e) => error!("Failed to save notified reminders: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webhook::CardStyle;
    use chrono::{Duration, Local, TimeZone};
    use tempfile::TempDir;

    fn service(dir: &TempDir) -> Result<ReminderService> {
        let store = StateStore::new(dir.path().join("data.json"));
        ReminderService::new(store, WebhookClient::new(CardStyle::default())?)
    }

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Local
            .with_ymd_and_hms(y, mo, d, h, mi, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[tokio::test]
    async fn test_tick_marks_due_once_and_skips_without_url() -> Result<()> {
        let dir = TempDir::new()?;
        let svc = service(&dir)?;
        svc.on_document_changed(
            Path::new("a.md"),
            "- [ ] Pay rent (gChat@2024-01-01 09:00)\n- [ ] Later (gChat@2099-01-01 09:00)",
        )
        .await;

        let now = local(2024, 1, 1, 9, 3);
        let first = svc.on_tick(now).await;
        assert_eq!(first.due, 1);
        assert_eq!(first.skipped, 1);

        let second = svc.on_tick(now + Duration::minutes(3)).await;
        assert_eq!(second, TickReport::default());

        let stored = StateStore::new(dir.path().join("data.json")).load()?;
        assert_eq!(stored.notified_tasks.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_notified_state_survives_restart() -> Result<()> {
        let dir = TempDir::new()?;
        let doc = "Call mom (gChat@2024-01-01 09:00)";
        let now = local(2024, 1, 2, 0, 0);

        let svc = service(&dir)?;
        svc.on_document_changed(Path::new("a.md"), doc).await;
        assert_eq!(svc.on_tick(now).await.due, 1);
        drop(svc);

        let restarted = service(&dir)?;
        restarted.on_document_changed(Path::new("a.md"), doc).await;
        assert_eq!(restarted.on_tick(now).await.due, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_changed_document_replaces_reminders() -> Result<()> {
        let dir = TempDir::new()?;
        let svc = service(&dir)?;
        let path = Path::new("a.md");

        svc.on_document_changed(path, "Old (gChat@2099-01-01 09:00)").await;
        svc.on_document_changed(path, "New (gChat@2099-01-02 09:00)").await;

        let reminders = svc.reminders().await;
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].1.content, "New");

        assert!(svc.forget_document(path).await);
        assert!(svc.reminders().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_dry_run_records_nothing() -> Result<()> {
        let dir = TempDir::new()?;
        let svc = service(&dir)?.with_dry_run(true);
        svc.on_document_changed(Path::new("a.md"), "X (gChat@2024-01-01 09:00)")
            .await;

        let now = local(2024, 1, 2, 0, 0);
        assert_eq!(svc.on_tick(now).await.due, 1);
        assert_eq!(svc.on_tick(now).await.due, 1);
        assert!(svc.notified().await.is_empty());
        assert!(!dir.path().join("data.json").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_date_never_fires() -> Result<()> {
        let dir = TempDir::new()?;
        let svc = service(&dir)?;
        svc.on_document_changed(Path::new("a.md"), "Bad (gChat@2024-02-31 09:00)")
            .await;

        assert_eq!(svc.on_tick(local(2999, 1, 1, 0, 0)).await, TickReport::default());
        Ok(())
    }

    #[tokio::test]
    async fn test_retention_prunes_old_identifiers() -> Result<()> {
        let dir = TempDir::new()?;
        let store = StateStore::new(dir.path().join("data.json"));
        let old: NotifiedSet = [crate::reminder::ReminderId::new(
            "Ancient",
            local(2020, 1, 1, 9, 0),
        )]
        .into_iter()
        .collect();
        store.merge_notified(&old)?;

        let svc = service(&dir)?.with_retention(Some(Duration::days(30)));
        svc.on_document_changed(Path::new("a.md"), "Fresh (gChat@2024-01-01 09:00)")
            .await;

        let report = svc.on_tick(local(2024, 1, 1, 10, 0)).await;

        assert_eq!(report.due, 1);
        assert_eq!(report.pruned, 1);
        assert_eq!(store.load()?.notified_tasks.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_reminder_past_retention_never_fires() -> Result<()> {
        let dir = TempDir::new()?;
        let svc = service(&dir)?.with_retention(Some(Duration::days(30)));
        svc.on_document_changed(Path::new("a.md"), "Pay rent (gChat@2024-01-01 09:00)")
            .await;

        let now = local(2024, 3, 1, 9, 0);
        for minutes in [0, 3, 6] {
            let report = svc.on_tick(now + Duration::minutes(minutes)).await;
            assert_eq!(report, TickReport::default());
        }
        assert!(svc.notified().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_pruned_reminder_stays_quiet() -> Result<()> {
        let dir = TempDir::new()?;
        let svc = service(&dir)?.with_retention(Some(Duration::days(30)));
        svc.on_document_changed(Path::new("a.md"), "Pay rent (gChat@2024-02-20 09:00)")
            .await;

        assert_eq!(svc.on_tick(local(2024, 3, 1, 9, 0)).await.due, 1);

        let later = local(2024, 4, 1, 9, 0);
        let report = svc.on_tick(later).await;
        assert_eq!((report.due, report.pruned), (0, 1));
        for minutes in [3, 6] {
            assert_eq!(svc.on_tick(later + Duration::minutes(minutes)).await.due, 0);
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_clear_from_other_process_is_kept() -> Result<()> {
        let dir = TempDir::new()?;
        let svc = service(&dir)?;
        let first = Path::new("a.md");
        svc.on_document_changed(first, "A (gChat@2024-01-01 09:00)").await;
        assert_eq!(svc.on_tick(local(2024, 1, 1, 9, 0)).await.due, 1);

        let other = StateStore::new(dir.path().join("data.json"));
        other.update(|state| state.notified_tasks.clear())?;

        svc.forget_document(first).await;
        svc.on_document_changed(Path::new("b.md"), "B (gChat@2024-01-02 09:00)")
            .await;
        assert_eq!(svc.on_tick(local(2024, 1, 2, 9, 0)).await.due, 1);

        let ids: Vec<String> = other
            .load()?
            .notified_tasks
            .iter()
            .map(|id| id.as_str().to_string())
            .collect();
        assert_eq!(ids.len(), 1);
        assert!(ids[0].starts_with("B-"));
        Ok(())
    }

    #[tokio::test]
    async fn test_cleared_reminder_fires_again() -> Result<()> {
        let dir = TempDir::new()?;
        let svc = service(&dir)?;
        svc.on_document_changed(Path::new("a.md"), "A (gChat@2024-01-01 09:00)")
            .await;
        let now = local(2024, 1, 1, 9, 0);
        assert_eq!(svc.on_tick(now).await.due, 1);
        assert_eq!(svc.on_tick(now).await.due, 0);

        StateStore::new(dir.path().join("data.json"))
            .update(|state| state.notified_tasks.clear())?;

        assert_eq!(svc.on_tick(now + Duration::minutes(3)).await.due, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_scan_vault() -> Result<()> {
        let dir = TempDir::new()?;
        let notes = dir.path().join("notes");
        std::fs::create_dir_all(&notes)?;
        std::fs::write(notes.join("a.md"), "One (gChat@2024-01-01 09:00)")?;
        std::fs::write(
            notes.join("b.md"),
            "Two (gChat@2024-01-01 09:00) Three (gChat@2024-01-01 10:00)",
        )?;

        let svc = service(&dir)?;
        let vault = Vault::open(&notes, &["md".to_string()])?;

        assert_eq!(svc.scan_vault(&vault).await?, 3);
        Ok(())
    }
}
