//! Async facade over the layout engine.
//!
//! Every operation starts a pass on the engine, awaits metrics for the
//! pass's items and then commits. The engine lock is only ever held for
//! the synchronous begin/commit steps, so a newer pass may start while an
//! older one is still waiting on metrics; the older one then commits as
//! `PassOutcome::Superseded`.

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, warn};

use super::debounce::ResizeSubscription;
use super::engine::{LayoutEngine, PassOutcome, PassTicket};
use crate::config::GridConfig;
use crate::error::{FolioError, Result};
use crate::metrics::{MetricsResolver, RenditionSource};
use crate::models::{LayoutSnapshot, PhotoId, PhotoItem};
use crate::surface::HostSurface;

struct Shared {
    /// `None` once destroyed.
    engine: Mutex<Option<LayoutEngine>>,
    resolver: MetricsResolver,
}

impl Shared {
    fn with_engine<T>(&self, f: impl FnOnce(&mut LayoutEngine) -> T) -> Result<T> {
        let mut guard = self.engine.lock();
        guard.as_mut().map(f).ok_or(FolioError::Destroyed)
    }

    async fn run(&self, ticket: PassTicket) -> Result<PassOutcome> {
        let outcomes = self.resolver.resolve_batch(ticket.items()).await;
        self.with_engine(|engine| engine.commit(ticket, &outcomes))
    }

    async fn resize(&self, width: f32) -> Result<Option<PassOutcome>> {
        match self.with_engine(|engine| engine.begin_resize(width))? {
            Some(ticket) => self.run(ticket).await.map(Some),
            None => Ok(None),
        }
    }
}

/// Owns a column grid: its engine, metrics resolver and resize listener.
pub struct GridController {
    shared: Arc<Shared>,
    resize: Mutex<Option<ResizeSubscription>>,
    debounce: Duration,
}

impl GridController {
    /// Creates a controller for `surface`.
    ///
    /// Fails with `FolioError::MissingSurface` if the surface has no container.
    pub fn new(
        config: &GridConfig,
        surface: &dyn HostSurface,
        source: Arc<dyn RenditionSource>,
    ) -> Result<Self> {
        let engine = LayoutEngine::new(config, surface.container_width())?;
        Ok(Self {
            shared: Arc::new(Shared {
                engine: Mutex::new(Some(engine)),
                resolver: MetricsResolver::new(source, config),
            }),
            resize: Mutex::new(None),
            debounce: config.resize_debounce,
        })
    }

    /// Replaces the collection with `batch` and lays it out from scratch.
    pub async fn layout(&self, batch: Vec<PhotoItem>) -> Result<PassOutcome> {
        let ticket = self.shared.with_engine(|engine| engine.begin_replace(batch))?;
        self.shared.run(ticket).await
    }

    /// Replays every known item.
    pub async fn relayout(&self) -> Result<PassOutcome> {
        let ticket = self.shared.with_engine(|engine| engine.begin_full())?;
        self.shared.run(ticket).await
    }

    /// Appends a further page of items to the end of the collection.
    pub async fn extend(&self, batch: Vec<PhotoItem>) -> Result<PassOutcome> {
        let ticket = self.shared.with_engine(|engine| engine.begin_extend(batch))?;
        self.shared.run(ticket).await
    }

    /// Adds a freshly uploaded item according to the new-item policy.
    pub async fn insert_new(&self, item: PhotoItem) -> Result<PassOutcome> {
        let ticket = self
            .shared
            .with_engine(|engine| engine.begin_insert_new(item))?;
        self.shared.run(ticket).await
    }

    /// Removes an item. Returns `None` if no item had that id.
    pub async fn remove(&self, id: &PhotoId) -> Result<Option<PassOutcome>> {
        match self.shared.with_engine(|engine| engine.begin_remove(id))? {
            Some(ticket) => self.shared.run(ticket).await.map(Some),
            None => Ok(None),
        }
    }

    /// Applies a container width immediately, bypassing the debounce.
    ///
    /// Returns `None` when the column count did not change.
    pub async fn resize(&self, width: f32) -> Result<Option<PassOutcome>> {
        self.shared.resize(width).await
    }

    pub fn snapshot(&self) -> Result<LayoutSnapshot> {
        self.shared.with_engine(|engine| engine.snapshot())
    }

    pub fn column_count(&self) -> Result<usize> {
        self.shared.with_engine(|engine| engine.column_count())
    }

    pub fn resolver(&self) -> &MetricsResolver {
        &self.shared.resolver
    }

    /// Starts the debounced resize listener. Must run inside a Tokio runtime.
    ///
    /// Calling it again replaces the previous listener.
    pub fn listen_for_resizes(&self) -> Result<()> {
        self.shared.with_engine(|_| ())?;
        let weak: Weak<Shared> = Arc::downgrade(&self.shared);
        let subscription = ResizeSubscription::spawn(self.debounce, move |width| {
            let weak = weak.clone();
            async move {
                let Some(shared) = weak.upgrade() else {
                    return;
                };
                match shared.resize(width).await {
                    Ok(Some(outcome)) => {
                        debug!(width, superseded = outcome.is_superseded(), "Relayout after resize")
                    }
                    Ok(None) => {}
                    Err(e) => warn!(error = %e, "Relayout after resize failed"),
                }
            }
        });
        *self.resize.lock() = Some(subscription);
        Ok(())
    }

    /// Feeds a raw container-resize notification to the listener.
    ///
    /// Returns false if no listener is running.
    pub fn notify_resize(&self, width: f32) -> bool {
        self.resize
            .lock()
            .as_ref()
            .is_some_and(|subscription| subscription.notify(width))
    }

    /// Tears the grid down: stops the resize listener and drops all state.
    ///
    /// Idempotent. Later operations fail with `FolioError::Destroyed`.
    pub fn destroy(&self) {
        if let Some(mut subscription) = self.resize.lock().take() {
            subscription.cancel();
        }
        if self.shared.engine.lock().take().is_some() {
            debug!("Destroyed grid controller");
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.shared.engine.lock().is_none()
    }
}

impl Drop for GridController {
    fn drop(&mut self) {
        self.destroy();
    }
}
