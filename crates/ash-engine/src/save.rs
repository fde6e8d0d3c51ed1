//! Save blob and the key-value store abstraction.
//!
//! The engine persists one JSON blob per save key: the full [`GameState`]
//! with the presentation-owned event log and journal riding along. Where
//! the blob lives is the store's business — a browser frontend can back
//! [`SaveStore`] with local storage, the CLI uses a directory of files, and
//! tests use an in-memory map.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use ash_core::GameState;

use crate::journal::{EventEntry, JournalEntry};

/// A minimal key-value persistence collaborator.
pub trait SaveStore {
    /// Read the blob stored under a key, if any.
    fn load(&self, key: &str) -> io::Result<Option<String>>;

    /// Write a blob under a key, replacing any prior value.
    fn store(&mut self, key: &str, blob: &str) -> io::Result<()>;
}

/// An in-memory store for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveStore for MemoryStore {
    fn load(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn store(&mut self, key: &str, blob: &str) -> io::Result<()> {
        self.slots.insert(key.to_string(), blob.to_string());
        Ok(())
    }
}

/// A store keeping one `<key>.json` file per key under a directory.
#[derive(Debug, Clone)]
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    /// Create a store rooted at `dir`. The directory is created on the
    /// first write, not here.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The file a key maps to.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// The root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SaveStore for DirStore {
    fn load(&self, key: &str) -> io::Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn store(&mut self, key: &str, blob: &str) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), blob)
    }
}

/// What actually gets serialized: the state plus the two auxiliary feeds.
///
/// The state's fields are flattened to the top level, so a blob reads as one
/// object. Missing fields fall back to the fresh-game template and unknown
/// keys are ignored, which keeps old and hand-edited saves loadable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaveBlob {
    /// The game state proper.
    #[serde(flatten)]
    pub state: GameState,
    /// Recent-events feed, newest first, bounded.
    #[serde(default, rename = "eventLog")]
    pub events: Vec<EventEntry>,
    /// Objectives journal, unbounded.
    #[serde(default)]
    pub journal: Vec<JournalEntry>,
}
