use std::time::Duration;

use crate::error::{FolioError, Result};

const DEFAULT_ITEM_WIDTH: f32 = 300.0;
const DEFAULT_GUTTER: f32 = 10.0;
/// Delay used to coalesce bursts of container resizes.
const DEFAULT_RESIZE_DEBOUNCE_MS: u64 = 80;
const DEFAULT_METRICS_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_METRICS_CACHE_ENTRIES: usize = 2048;
/// Series larger than this are truncated when opened in the viewer.
const DEFAULT_MAX_SERIES_SIZE: usize = 5;
const DEFAULT_SWIPE_THRESHOLD: f32 = 50.0;
const DEFAULT_VERTICAL_THRESHOLD: f32 = 80.0;

fn env_f32(key: &str) -> Option<f32> {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<f32>().ok())
        .filter(|v| v.is_finite() && *v > 0.0)
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
}

/// Which end of the collection newly uploaded items enter from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewItemPolicy {
    /// New items go to the front; placing one replays the whole collection.
    Prepend,
    /// New items go to the end and are placed without a replay.
    Append,
}

impl NewItemPolicy {
    fn from_str_lossy(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "prepend" | "front" => Some(Self::Prepend),
            "append" | "back" | "end" => Some(Self::Append),
            _ => None,
        }
    }
}

/// Configuration for the column grid and its metrics resolver.
#[derive(Debug, Clone)]
pub struct GridConfig {
    /// Fixed width of every column in pixels (default: 300)
    pub item_width: f32,
    /// Space between columns and between stacked items (default: 10)
    pub gutter: f32,
    /// Aspect ratio assumed for items whose metrics could not be resolved (default: 1.0)
    pub fallback_aspect: f32,
    pub resize_debounce: Duration,
    /// Upper bound on how long a single item may take to resolve.
    pub metrics_timeout: Duration,
    pub metrics_cache_entries: usize,
    pub new_item_policy: NewItemPolicy,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            item_width: DEFAULT_ITEM_WIDTH,
            gutter: DEFAULT_GUTTER,
            fallback_aspect: 1.0,
            resize_debounce: Duration::from_millis(DEFAULT_RESIZE_DEBOUNCE_MS),
            metrics_timeout: Duration::from_millis(DEFAULT_METRICS_TIMEOUT_MS),
            metrics_cache_entries: DEFAULT_METRICS_CACHE_ENTRIES,
            new_item_policy: NewItemPolicy::Prepend,
        }
    }
}

impl GridConfig {
    /// Defaults overridden by `FOLIO_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(width) = env_f32("FOLIO_ITEM_WIDTH") {
            config.item_width = width;
        }
        // Zero is a legal gutter, so this one is parsed separately.
        if let Some(gutter) = std::env::var("FOLIO_GUTTER")
            .ok()
            .and_then(|v| v.trim().parse::<f32>().ok())
            .filter(|v| v.is_finite() && *v >= 0.0)
        {
            config.gutter = gutter;
        }
        if let Some(ms) = env_u64("FOLIO_RESIZE_DEBOUNCE_MS") {
            config.resize_debounce = Duration::from_millis(ms);
        }
        if let Some(ms) = env_u64("FOLIO_METRICS_TIMEOUT_MS") {
            config.metrics_timeout = Duration::from_millis(ms);
        }
        if let Some(policy) = std::env::var("FOLIO_NEW_ITEMS")
            .ok()
            .and_then(|v| NewItemPolicy::from_str_lossy(&v))
        {
            config.new_item_policy = policy;
        }
        config
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.item_width.is_finite() && self.item_width > 0.0) {
            return Err(FolioError::InvalidConfig(format!(
                "item width must be positive, got {}",
                self.item_width
            )));
        }
        if !(self.gutter.is_finite() && self.gutter >= 0.0) {
            return Err(FolioError::InvalidConfig(format!(
                "gutter must be non-negative, got {}",
                self.gutter
            )));
        }
        if !(self.fallback_aspect.is_finite() && self.fallback_aspect > 0.0) {
            return Err(FolioError::InvalidConfig(format!(
                "fallback aspect must be positive, got {}",
                self.fallback_aspect
            )));
        }
        Ok(())
    }

    /// Height given to an item whose dimensions never resolved.
    pub fn fallback_height(&self) -> f32 {
        self.item_width / self.fallback_aspect
    }
}

/// Configuration for the full-screen viewer.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub max_series_size: usize,
    /// Horizontal drag distance that counts as a prev/next swipe.
    pub swipe_threshold: f32,
    /// Vertical drag distance that toggles continuous mode.
    pub vertical_threshold: f32,
    pub captions_visible: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            max_series_size: DEFAULT_MAX_SERIES_SIZE,
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
            vertical_threshold: DEFAULT_VERTICAL_THRESHOLD,
            captions_visible: true,
        }
    }
}

impl ViewerConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(max) = env_u64("FOLIO_MAX_SERIES") {
            config.max_series_size = max as usize;
        }
        if let Some(px) = env_f32("FOLIO_SWIPE_PX") {
            config.swipe_threshold = px;
        }
        config
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_series_size == 0 {
            return Err(FolioError::InvalidConfig(
                "max series size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(GridConfig::default().validate().is_ok());
        assert!(ViewerConfig::default().validate().is_ok());
        assert_eq!(ViewerConfig::default().max_series_size, 5);
    }

    #[test]
    fn test_rejects_bad_values() {
        let config = GridConfig {
            item_width: 0.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(FolioError::InvalidConfig(_))));

        let config = GridConfig {
            gutter: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let viewer = ViewerConfig {
            max_series_size: 0,
            ..Default::default()
        };
        assert!(viewer.validate().is_err());
    }

    #[test]
    fn test_fallback_height_follows_aspect() {
        let config = GridConfig {
            item_width: 300.0,
            fallback_aspect: 1.5,
            ..Default::default()
        };
        assert!((config.fallback_height() - 200.0).abs() < 0.01);
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!(
            NewItemPolicy::from_str_lossy(" Append "),
            Some(NewItemPolicy::Append)
        );
        assert_eq!(
            NewItemPolicy::from_str_lossy("front"),
            Some(NewItemPolicy::Prepend)
        );
        assert_eq!(NewItemPolicy::from_str_lossy("sideways"), None);
    }
}
