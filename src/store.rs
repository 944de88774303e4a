//! Persistent key/value storage
//!
//! Saved games live under the `puzzle-lab` key as a JSON array of
//! `[name, text]` pairs. `FileStore` keeps one file per key in the data
//! directory.

use crate::types::SavedGame;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Key holding the saved game list
pub const SAVED_GAMES_KEY: &str = "puzzle-lab";

/// Minimal key/value store
pub trait Store {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Store backed by `<dir>/<key>.json` files
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Default location: `<data dir>/puzzlelab`
    pub fn default_dir() -> Result<PathBuf> {
        let dir = dirs::data_dir()
            .context("Could not determine data directory")?
            .join("puzzlelab");
        Ok(dir)
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Store for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {:?}", path))?;
        Ok(Some(content))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create data directory {:?}", self.dir))?;

        let path = self.path_for(key);
        fs::write(&path, value).with_context(|| format!("Failed to write {:?}", path))?;
        Ok(())
    }
}

/// Load saved games; a missing or unreadable payload yields an empty list
pub fn load_saved_games(store: &dyn Store) -> Vec<SavedGame> {
    store
        .get_item(SAVED_GAMES_KEY)
        .ok()
        .flatten()
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default()
}

/// Persist the saved game list
pub fn write_saved_games(store: &mut dyn Store, games: &[SavedGame]) -> Result<()> {
    let payload = serde_json::to_string(games).context("Failed to serialize saved games")?;
    store.set_item(SAVED_GAMES_KEY, &payload)
}

/// In-memory store for tests
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub items: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl Store for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store that reads from `items` and refuses every write
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ReadOnlyStore {
    pub items: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl ReadOnlyStore {
    pub fn with_games(games: &[SavedGame]) -> Self {
        let mut store = MemoryStore::default();
        write_saved_games(&mut store, games).expect("memory store accepts writes");
        Self { items: store.items }
    }
}

#[cfg(test)]
impl Store for ReadOnlyStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, _key: &str, _value: &str) -> Result<()> {
        anyhow::bail!("disk full")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_memory() {
        let mut store = MemoryStore::default();
        let games = vec![SavedGame::new("a", "1"), SavedGame::new("a", "2")];
        write_saved_games(&mut store, &games).unwrap();
        assert_eq!(load_saved_games(&store), games);
    }

    #[test]
    fn test_garbage_payload_loads_empty() {
        let mut store = MemoryStore::default();
        store.set_item(SAVED_GAMES_KEY, "{not json").unwrap();
        assert!(load_saved_games(&store).is_empty());
    }

    #[test]
    fn test_file_store_writes_key_file() {
        let dir = std::env::temp_dir().join(format!("puzzlelab-store-{}", std::process::id()));
        let mut store = FileStore::new(&dir);
        assert_eq!(store.get_item("missing").unwrap(), None);

        store.set_item(SAVED_GAMES_KEY, "[]").unwrap();
        assert_eq!(store.get_item(SAVED_GAMES_KEY).unwrap().as_deref(), Some("[]"));
        assert!(dir.join("puzzle-lab.json").exists());

        let _ = fs::remove_dir_all(&dir);
    }
}
