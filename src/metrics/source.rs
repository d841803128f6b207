use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use parking_lot::RwLock;

/// Supplies the raw bytes of an image rendition.
///
/// Implementations may block; the resolver always calls them from a
/// blocking worker.
pub trait RenditionSource: Send + Sync {
    fn fetch(&self, locator: &str) -> Result<Vec<u8>>;
}

/// Reads renditions from the local filesystem.
///
/// Relative locators are resolved against `root`.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, locator: &str) -> PathBuf {
        let path = Path::new(locator);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl RenditionSource for FileSource {
    fn fetch(&self, locator: &str) -> Result<Vec<u8>> {
        let path = self.path_for(locator);
        std::fs::read(&path).with_context(|| format!("Failed to read rendition: {:?}", path))
    }
}

/// In-memory renditions keyed by locator.
#[derive(Default)]
pub struct MemorySource {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, locator: impl Into<String>, bytes: Vec<u8>) {
        self.entries.write().insert(locator.into(), bytes);
    }
}

impl RenditionSource for MemorySource {
    fn fetch(&self, locator: &str) -> Result<Vec<u8>> {
        self.entries
            .read()
            .get(locator)
            .cloned()
            .ok_or_else(|| anyhow!("No rendition stored for {}", locator))
    }
}
