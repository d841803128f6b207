//! Builds a photo batch from a local directory.
//!
//! Each image file becomes one `PhotoItem`. The directory directly holding a
//! file is taken as its author, so `root/alice/*.jpg` are Alice's photos.
//! Dimensions are left unresolved for the metrics resolver.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::models::{Attribution, Caption, PhotoItem, Rendition};

const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "webp", "gif", "bmp", "tiff", "tif",
];

/// Author assigned to files sitting directly in the scan root.
const ROOT_AUTHOR: &str = "local";

/// Configuration for directory discovery.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub recursive: bool,
    /// Maximum directory depth (0 = unlimited).
    pub max_depth: usize,
    pub follow_symlinks: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            recursive: true,
            max_depth: 0,
            follow_symlinks: false,
        }
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Discovers image files under `root`, sorted by path.
///
/// Locators are relative to `root`, to be read back through a `FileSource`.
pub fn discover_photos(root: &Path, config: &ScanConfig) -> Result<Vec<PhotoItem>> {
    if !root.is_dir() {
        anyhow::bail!("Not a directory: {:?}", root);
    }

    let mut walker = WalkDir::new(root).follow_links(config.follow_symlinks);
    if !config.recursive {
        walker = walker.max_depth(1);
    } else if config.max_depth > 0 {
        walker = walker.max_depth(config.max_depth);
    }

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in walker.into_iter() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry");
                continue;
            }
        };
        if entry.file_type().is_file() && is_image(entry.path()) {
            paths.push(entry.into_path());
        }
    }
    paths.sort();

    let items = paths
        .iter()
        .map(|path| photo_for_path(root, path))
        .collect::<Result<Vec<_>>>()?;
    debug!(root = ?root, items = items.len(), "Discovered photos");
    Ok(items)
}

fn photo_for_path(root: &Path, path: &Path) -> Result<PhotoItem> {
    let relative = path
        .strip_prefix(root)
        .with_context(|| format!("Path escaped scan root: {:?}", path))?;
    let locator = relative.to_string_lossy().replace('\\', "/");

    let author = relative
        .parent()
        .and_then(|p| p.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| ROOT_AUTHOR.to_string());
    let title = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned());

    Ok(PhotoItem::new(
        locator.clone(),
        Rendition::single(locator),
        Attribution::new(author.clone(), author),
    )
    .with_caption(Caption {
        title,
        ..Default::default()
    }))
}
