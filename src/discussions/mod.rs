//! Discussion repository for CareMatch.
//!
//! The engine scores discussions from an in-memory snapshot handed over by the
//! caller. Where that snapshot comes from is hidden behind
//! [`DiscussionRepository`]: an in-memory list for tests and embedding, or a
//! JSON file at `~/.carematch/discussions.json` for the CLI.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::debug;

use crate::candidates::Discussion;
use crate::config::Config;
use crate::error::{MatchError, Result};

/// Storage for community discussions.
pub trait DiscussionRepository: Send + Sync {
    /// Snapshot of every stored discussion, oldest first.
    fn list(&self) -> Result<Vec<Discussion>>;

    /// Store a new discussion and return it as stored (id and timestamp filled in).
    fn append(&mut self, discussion: Discussion) -> Result<Discussion>;
}

/// Fill in the id and creation time if the caller left them blank.
fn prepare(mut discussion: Discussion) -> Result<Discussion> {
    if discussion.title.trim().is_empty() {
        return Err(MatchError::Config(
            "discussion title cannot be empty".to_string(),
        ));
    }
    if discussion.id.trim().is_empty() {
        discussion.id = uuid::Uuid::new_v4().to_string();
    }
    if discussion.created_at.is_none() {
        discussion.created_at = Some(Utc::now());
    }
    Ok(discussion)
}

// ============================================================================
// In-memory
// ============================================================================

/// Discussions kept in a plain vector.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDiscussions {
    entries: Vec<Discussion>,
}

impl InMemoryDiscussions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<Discussion>) -> Self {
        Self { entries }
    }
}

impl DiscussionRepository for InMemoryDiscussions {
    fn list(&self) -> Result<Vec<Discussion>> {
        Ok(self.entries.clone())
    }

    fn append(&mut self, discussion: Discussion) -> Result<Discussion> {
        let discussion = prepare(discussion)?;
        self.entries.push(discussion.clone());
        Ok(discussion)
    }
}

// ============================================================================
// JSON file
// ============================================================================

/// Discussions persisted as a single JSON array.
#[derive(Debug)]
pub struct JsonDiscussionStore {
    entries: Vec<Discussion>,
    storage_path: PathBuf,
}

impl JsonDiscussionStore {
    /// Open the store at the default path (`~/.carematch/discussions.json`).
    pub fn new() -> Result<Self> {
        Self::with_path(Config::dir().join("discussions.json"))
    }

    /// Open the store at a custom path. A missing file is an empty store.
    pub fn with_path(path: PathBuf) -> Result<Self> {
        let entries = Self::load(&path)?;
        Ok(Self {
            entries,
            storage_path: path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    fn load(path: &Path) -> Result<Vec<Discussion>> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let entries: Vec<Discussion> = serde_json::from_str(&content)?;
        debug!(path = %path.display(), count = entries.len(), "Loaded discussions");
        Ok(entries)
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.storage_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.storage_path, json)?;
        Ok(())
    }
}

impl DiscussionRepository for JsonDiscussionStore {
    fn list(&self) -> Result<Vec<Discussion>> {
        Ok(self.entries.clone())
    }

    fn append(&mut self, discussion: Discussion) -> Result<Discussion> {
        let discussion = prepare(discussion)?;
        self.entries.push(discussion.clone());
        self.save()?;
        Ok(discussion)
    }
}
