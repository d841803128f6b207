//! Concurrent metrics resolution for a batch of photos.
//!
//! Every item in a batch resolves independently on a blocking worker.
//! A failing, panicking or slow item resolves to `MetricOutcome::Failed`,
//! so waiting on a batch always completes once each item has finished or
//! timed out.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{debug, trace, warn};

use super::cache::{MetricOutcome, MetricsCache};
use super::decode;
use super::source::RenditionSource;
use crate::config::GridConfig;
use crate::error::FolioError;
use crate::models::PhotoItem;

/// Resolves intrinsic dimensions of reduced renditions.
#[derive(Clone)]
pub struct MetricsResolver {
    source: Arc<dyn RenditionSource>,
    cache: MetricsCache,
    timeout: Duration,
}

impl MetricsResolver {
    pub fn new(source: Arc<dyn RenditionSource>, config: &GridConfig) -> Self {
        Self {
            source,
            cache: MetricsCache::new(config.metrics_cache_entries),
            timeout: config.metrics_timeout,
        }
    }

    pub fn cache(&self) -> &MetricsCache {
        &self.cache
    }

    /// Outcome for `item` if it needs no fetch.
    pub fn lookup(&self, item: &PhotoItem) -> Option<MetricOutcome> {
        self.cache.lookup(item)
    }

    /// Resolves every item in `items`, returning outcomes in the same order.
    pub async fn resolve_batch(&self, items: &[PhotoItem]) -> Vec<MetricOutcome> {
        let mut outcomes: Vec<Option<MetricOutcome>> =
            items.iter().map(|item| self.cache.lookup(item)).collect();

        let pending: Vec<(usize, String)> = outcomes
            .iter()
            .enumerate()
            .filter(|(_, outcome)| outcome.is_none())
            .map(|(index, _)| (index, items[index].rendition.reduced.clone()))
            .collect();

        if pending.is_empty() {
            trace!(items = items.len(), "All metrics already known");
            return outcomes.into_iter().flatten().collect();
        }

        debug!(
            items = items.len(),
            pending = pending.len(),
            "Resolving item metrics"
        );

        let mut set = JoinSet::new();
        for (index, locator) in &pending {
            let index = *index;
            let locator = locator.clone();
            let source = Arc::clone(&self.source);
            let timeout = self.timeout;
            set.spawn(async move {
                let fetch_locator = locator.clone();
                let task = tokio::task::spawn_blocking(move || {
                    let bytes = source.fetch(&fetch_locator)?;
                    decode::read_dimensions(&bytes)
                });

                // Timeouts are transient and must not be cached.
                let (outcome, cacheable) = match tokio::time::timeout(timeout, task).await {
                    Ok(Ok(Ok((width, height)))) => {
                        (MetricOutcome::Resolved { width, height }, true)
                    }
                    Ok(Ok(Err(e))) => {
                        warn!(%locator, error = ?e, "Failed to resolve item metrics");
                        (MetricOutcome::Failed, true)
                    }
                    Ok(Err(e)) => {
                        warn!(%locator, error = ?e, "Metrics worker panicked");
                        (MetricOutcome::Failed, true)
                    }
                    Err(_) => {
                        warn!(%locator, ?timeout, "Item metrics timed out");
                        (MetricOutcome::Failed, false)
                    }
                };
                (index, outcome, cacheable)
            });
        }

        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((index, outcome, cacheable)) => {
                    if cacheable {
                        self.cache.insert(&items[index].rendition.reduced, outcome);
                    }
                    outcomes[index] = Some(outcome);
                }
                Err(e) => {
                    let error = FolioError::MetricsTask(e.to_string());
                    warn!(%error, "Lost a metrics task; its item uses the fallback");
                }
            }
        }

        outcomes
            .into_iter()
            .map(|outcome| outcome.unwrap_or(MetricOutcome::Failed))
            .collect()
    }
}
