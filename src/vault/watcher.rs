//! File-change notifications for a vault

use anyhow::{Context, Result};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::Vault;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultEvent {
    /// Document created or modified
    Changed(PathBuf),
    /// Document deleted or renamed away
    Removed(PathBuf),
}

/// Watches a vault recursively and yields document events
pub struct VaultWatcher {
    _watcher: RecommendedWatcher,
    events: mpsc::UnboundedReceiver<VaultEvent>,
}

impl VaultWatcher {
    pub fn start(vault: &Vault) -> Result<Self> {
        let (tx, events) = mpsc::unbounded_channel();
        let filter = vault.clone();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            let event = match res {
                Ok(event) => event,
                Err(e) => {
                    warn!("File watcher error: {}", e);
                    return;
                }
            };

            if !matches!(
                event.kind,
                EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
            ) {
                return;
            }

            for path in event.paths {
                if !filter.is_document(&path) {
                    continue;
                }
                // Renames and editor save-swaps arrive as a mix of kinds, so
                // the file's presence decides the event.
                let vault_event = if path.exists() {
                    VaultEvent::Changed(path)
                } else {
                    VaultEvent::Removed(path)
                };
                debug!("{:?}", vault_event);
                // Receiver dropped means the daemon is shutting down.
                let _ = tx.send(vault_event);
            }
        })
        .context("Failed to create file watcher")?;

        watcher
            .watch(vault.root(), RecursiveMode::Recursive)
            .with_context(|| format!("Failed to watch {}", vault.root().display()))?;

        Ok(Self {
            _watcher: watcher,
            events,
        })
    }

    /// Next document event; `None` once the watcher has stopped
    pub async fn next(&mut self) -> Option<VaultEvent> {
        self.events.recv().await
    }
}
