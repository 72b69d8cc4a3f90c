//! Persistence for the closed-tab history.
//!
//! The store holds an ordered array of JSON strings, one serialized record
//! per element, newest first. Each entry is parsed independently on restore
//! so a single malformed entry never poisons the rest of the history.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use xxhash_rust::xxh3::xxh3_64;

/// Durable store for serialized history entries, scoped per workspace.
///
/// I/O failures are propagated to the caller; the history cache never
/// silently drops history on a failed write.
pub trait HistoryStore {
    fn load(&self) -> Result<Vec<String>>;
    fn save(&self, entries: &[String]) -> Result<()>;
}

/// Get the tabkeeper config directory: ~/.config/tabkeeper/
pub fn tabkeeper_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".config").join("tabkeeper"))
}

/// Get the history directory: ~/.config/tabkeeper/history/
pub fn history_dir() -> Option<PathBuf> {
    tabkeeper_dir().map(|p| p.join("history"))
}

/// JSON-file-backed store.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store scoped to one workspace: the file name is derived from a hash
    /// of the workspace root so each workspace keeps its own history.
    pub fn for_workspace(workspace_root: &Path) -> Option<Self> {
        let dir = history_dir()?;
        let key = xxh3_64(workspace_root.to_string_lossy().as_bytes());
        Some(Self::new(dir.join(format!("{:016x}.json", key))))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for JsonFileStore {
    fn load(&self) -> Result<Vec<String>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read history: {}", self.path.display()))?;
        let entries = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse history: {}", self.path.display()))?;
        Ok(entries)
    }

    fn save(&self, entries: &[String]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create history directory: {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write history: {}", self.path.display()))?;
        Ok(())
    }
}

/// In-memory store for tests and ephemeral sessions. Clones share the same
/// backing storage, so a handle kept by the test observes cache writes.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: std::rc::Rc<std::cell::RefCell<Vec<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<String>) -> Self {
        Self {
            entries: std::rc::Rc::new(std::cell::RefCell::new(entries)),
        }
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }
}

impl HistoryStore for MemoryStore {
    fn load(&self) -> Result<Vec<String>> {
        Ok(self.entries.borrow().clone())
    }

    fn save(&self, entries: &[String]) -> Result<()> {
        *self.entries.borrow_mut() = entries.to_vec();
        Ok(())
    }
}
