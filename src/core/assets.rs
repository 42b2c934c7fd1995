//=========================================================================
// Assets
//=========================================================================
//
// Read-only access to bundled game data.
//
// A failed load is an absent result, never an error: the caller decides
// whether a missing asset is fatal.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::{debug, warn};

//=== AssetSource =========================================================

pub trait AssetSource: Send + Sync {
    /// Loads a UTF-8 asset by relative name.
    fn load_text(&self, name: &str) -> Option<String>;
}

//=== DirectoryAssets =====================================================

/// Assets stored under a directory on disk.
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    root: PathBuf,
}

impl DirectoryAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for DirectoryAssets {
    fn load_text(&self, name: &str) -> Option<String> {
        let path = self.root.join(name);
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                debug!(target: "game", "Loaded asset {}", path.display());
                Some(text)
            }
            Err(e) => {
                warn!(target: "game", "Cannot load asset {}: {}", path.display(), e);
                None
            }
        }
    }
}

//=== MemoryAssets ========================================================

/// Assets held in memory, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    files: HashMap<String, String>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(name, text);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.files.insert(name.into(), text.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.files.remove(name)
    }
}

impl AssetSource for MemoryAssets {
    fn load_text(&self, name: &str) -> Option<String> {
        self.files.get(name).cloned()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_assets_lookup() {
        let assets = MemoryAssets::new().with("config.json", "{}");
        assert_eq!(assets.load_text("config.json").as_deref(), Some("{}"));
        assert_eq!(assets.load_text("missing.json"), None);
    }

    #[test]
    fn directory_assets_missing_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let assets = DirectoryAssets::new(dir.path().join("no-such-dir"));
        assert_eq!(assets.load_text("map.json"), None);
    }

    #[test]
    fn directory_assets_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.json"), "{\"a\":1}").unwrap();

        let assets = DirectoryAssets::new(dir.path());
        assert_eq!(assets.load_text("config.json").as_deref(), Some("{\"a\":1}"));
        assert_eq!(assets.load_text("map.json"), None);
    }
}
