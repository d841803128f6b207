//! Item metrics for the column grid.
//!
//! - `RenditionSource` - where reduced-resolution rendition bytes come from
//! - `MetricsCache` - LRU of resolved intrinsic dimensions
//! - `MetricsResolver` - concurrent batch resolution with per-item fallback

pub mod cache;
pub mod decode;
pub mod resolver;
pub mod source;

pub use cache::{MetricOutcome, MetricsCache};
pub use resolver::MetricsResolver;
pub use source::{FileSource, MemorySource, RenditionSource};
