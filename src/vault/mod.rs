//! Notes directory access
//!
//! A vault is a directory tree of markdown documents. Hidden directories
//! (`.git`, `.obsidian`, `.trash`) are never scanned.

pub mod watcher;

pub use watcher::{VaultEvent, VaultWatcher};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Vault {
    root: PathBuf,
    extensions: Vec<String>,
}

impl Vault {
    pub fn new(root: impl Into<PathBuf>, extensions: &[String]) -> Self {
        Self {
            root: root.into(),
            extensions: extensions.iter().map(|e| e.to_lowercase()).collect(),
        }
    }

    /// Open an existing vault directory. The root is canonicalized so that
    /// scanned paths and watcher event paths name documents identically.
    pub fn open(root: &Path, extensions: &[String]) -> Result<Self> {
        let root = fs::canonicalize(root)
            .with_context(|| format!("Vault directory not found: {}", root.display()))?;
        if !root.is_dir() {
            anyhow::bail!("Vault path is not a directory: {}", root.display());
        }
        Ok(Self::new(root, extensions))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Whether `path` names a document this vault scans
    pub fn is_document(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        has_extension(path, &self.extensions) && !is_hidden(relative)
    }

    /// Every document under the root, sorted
    pub fn documents(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            anyhow::bail!("Vault directory not found: {}", self.root.display());
        }
        let mut docs = Vec::new();
        self.collect(&self.root, &mut docs)?;
        docs.sort();
        Ok(docs)
    }

    fn collect(&self, dir: &Path, docs: &mut Vec<PathBuf>) -> Result<()> {
        let entries =
            fs::read_dir(dir).with_context(|| format!("Failed to read directory {:?}", dir))?;

        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }

            if entry.file_type()?.is_dir() {
                self.collect(&path, docs)?;
            } else if has_extension(&path, &self.extensions) {
                docs.push(path);
            }
        }

        Ok(())
    }

    pub async fn read(&self, path: &Path) -> Result<String> {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {:?}", path))
    }
}

pub(crate) fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| extensions.iter().any(|e| *e == ext))
}

fn is_hidden(relative: &Path) -> bool {
    relative
        .components()
        .any(|c| c.as_os_str().to_string_lossy().starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn md() -> Vec<String> {
        vec!["md".to_string()]
    }

    fn sample_vault() -> Result<TempDir> {
        let dir = TempDir::new()?;
        fs::create_dir_all(dir.path().join("daily"))?;
        fs::create_dir_all(dir.path().join(".obsidian"))?;
        fs::write(dir.path().join("inbox.md"), "- [ ] a (gChat@2024-01-01 09:00)")?;
        fs::write(dir.path().join("daily").join("2024-01-01.MD"), "b")?;
        fs::write(dir.path().join("image.png"), "")?;
        fs::write(dir.path().join(".obsidian").join("workspace.md"), "")?;
        Ok(dir)
    }

    #[test]
    fn test_documents_skip_hidden_and_other_extensions() -> Result<()> {
        let dir = sample_vault()?;
        let vault = Vault::new(dir.path(), &md());

        let docs = vault.documents()?;

        assert_eq!(
            docs,
            vec![
                dir.path().join("daily").join("2024-01-01.MD"),
                dir.path().join("inbox.md"),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_is_document() {
        let vault = Vault::new("/notes", &md());
        assert!(vault.is_document(Path::new("/notes/a.md")));
        assert!(vault.is_document(Path::new("/notes/sub/b.Md")));
        assert!(!vault.is_document(Path::new("/notes/.trash/c.md")));
        assert!(!vault.is_document(Path::new("/notes/d.txt")));
        assert!(!vault.is_document(Path::new("/notes/md")));
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let vault = Vault::new("/definitely/not/a/vault", &md());
        assert!(vault.documents().is_err());
        assert!(Vault::open(Path::new("/definitely/not/a/vault"), &md()).is_err());
    }

    #[test]
    fn test_open_canonicalizes_root() -> Result<()> {
        let dir = sample_vault()?;
        let vault = Vault::open(&dir.path().join("daily").join(".."), &md())?;
        assert_eq!(vault.root(), fs::canonicalize(dir.path())?);
        Ok(())
    }

    #[tokio::test]
    async fn test_read() -> Result<()> {
        let dir = sample_vault()?;
        let vault = Vault::new(dir.path(), &md());
        let text = vault.read(&dir.path().join("inbox.md")).await?;
        assert!(text.contains("gChat@"));
        Ok(())
    }
}
