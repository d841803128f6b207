//! Stateful column layout with pass tokens.
//!
//! A pass is split in two so that metric resolution can be awaited without
//! holding the engine:
//! 1. `begin_*` mutates the collection, bumps the pass token and returns a
//!    `PassTicket` naming the items whose footprints are needed.
//! 2. `commit` places those items, unless a newer pass has started since,
//!    in which case the ticket is stale and its result is dropped.

use std::collections::HashSet;

use tracing::{debug, trace, warn};

use super::columns::{pack, ColumnHeights, ColumnLayout};
use crate::config::{GridConfig, NewItemPolicy};
use crate::error::{FolioError, Result};
use crate::metrics::MetricOutcome;
use crate::models::{LayoutSnapshot, PhotoId, PhotoItem, Placement};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Reset every column and replay the whole collection.
    Full,
    /// Place new items after the current last placement.
    Append,
}

/// A started layout pass awaiting metrics.
#[derive(Debug, Clone)]
pub struct PassTicket {
    token: u64,
    kind: PassKind,
    column_count: usize,
    items: Vec<PhotoItem>,
}

impl PassTicket {
    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn kind(&self) -> PassKind {
        self.kind
    }

    /// Items that need footprints, in placement order.
    pub fn items(&self) -> &[PhotoItem] {
        &self.items
    }
}

/// Result of committing a pass.
#[derive(Debug, Clone, PartialEq)]
pub enum PassOutcome {
    Committed(LayoutSnapshot),
    /// A newer pass started before this one finished.
    Superseded { token: u64, current: u64 },
}

impl PassOutcome {
    pub fn total_height(&self) -> Option<f32> {
        match self {
            Self::Committed(snapshot) => Some(snapshot.total_height),
            Self::Superseded { .. } => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded { .. })
    }
}

/// Column layout state for one grid instance.
pub struct LayoutEngine {
    layout: ColumnLayout,
    fallback_height: f32,
    new_item_policy: NewItemPolicy,
    container_width: f32,
    column_count: usize,
    items: Vec<PhotoItem>,
    heights: ColumnHeights,
    placements: Vec<Placement>,
    /// Token of the most recently started pass.
    pass: u64,
    /// Token of the most recently committed pass.
    committed: u64,
}

impl LayoutEngine {
    /// Creates an engine for a container of `container_width`.
    ///
    /// A missing container is the one fatal condition: nothing can be laid out.
    pub fn new(config: &GridConfig, container_width: Option<f32>) -> Result<Self> {
        config.validate()?;
        let container_width = container_width
            .filter(|w| w.is_finite() && *w >= 0.0)
            .ok_or(FolioError::MissingSurface)?;

        let layout = ColumnLayout::new(config.item_width, config.gutter);
        let column_count = layout.column_count(container_width);
        debug!(container_width, column_count, "Created layout engine");

        Ok(Self {
            layout,
            fallback_height: config.fallback_height(),
            new_item_policy: config.new_item_policy,
            container_width,
            column_count,
            items: Vec::new(),
            heights: ColumnHeights::new(column_count),
            placements: Vec::new(),
            pass: 0,
            committed: 0,
        })
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn container_width(&self) -> f32 {
        self.container_width
    }

    pub fn items(&self) -> &[PhotoItem] {
        &self.items
    }

    pub fn current_pass(&self) -> u64 {
        self.pass
    }

    /// Whether a started pass has not been committed yet.
    pub fn has_pending_pass(&self) -> bool {
        self.pass != self.committed
    }

    fn next_ticket(&mut self, kind: PassKind, items: Vec<PhotoItem>) -> PassTicket {
        self.pass += 1;
        trace!(pass = self.pass, ?kind, items = items.len(), "Started layout pass");
        PassTicket {
            token: self.pass,
            kind,
            column_count: self.column_count,
            items,
        }
    }

    fn dedup_incoming(&self, incoming: Vec<PhotoItem>) -> Vec<PhotoItem> {
        let mut seen: HashSet<PhotoId> = self.items.iter().map(|i| i.id.clone()).collect();
        incoming
            .into_iter()
            .filter(|item| {
                let fresh = seen.insert(item.id.clone());
                if !fresh {
                    warn!(id = %item.id, "Ignoring duplicate photo id");
                }
                fresh
            })
            .collect()
    }

    /// Replaces the collection with `batch` and starts a full pass.
    pub fn begin_replace(&mut self, batch: Vec<PhotoItem>) -> PassTicket {
        self.items.clear();
        self.items = self.dedup_incoming(batch);
        self.begin_full()
    }

    /// Starts a full pass over the current collection.
    pub fn begin_full(&mut self) -> PassTicket {
        let items = self.items.clone();
        self.next_ticket(PassKind::Full, items)
    }

    /// Appends `batch` to the end of the collection.
    ///
    /// The new items are placed without replay unless another pass is still
    /// in flight, in which case the append is folded into a full pass.
    pub fn begin_extend(&mut self, batch: Vec<PhotoItem>) -> PassTicket {
        let batch = self.dedup_incoming(batch);
        let in_sync = !self.has_pending_pass() && self.placements.len() == self.items.len();
        self.items.extend(batch.iter().cloned());
        if in_sync {
            self.next_ticket(PassKind::Append, batch)
        } else {
            self.begin_full()
        }
    }

    /// Adds a freshly uploaded item according to the configured policy.
    pub fn begin_insert_new(&mut self, item: PhotoItem) -> PassTicket {
        match self.new_item_policy {
            NewItemPolicy::Append => self.begin_extend(vec![item]),
            NewItemPolicy::Prepend => {
                let mut fresh = self.dedup_incoming(vec![item]);
                if let Some(item) = fresh.pop() {
                    self.items.insert(0, item);
                }
                self.begin_full()
            }
        }
    }

    /// Removes the item with `id`; returns a full pass if it was present.
    pub fn begin_remove(&mut self, id: &PhotoId) -> Option<PassTicket> {
        let index = self.items.iter().position(|item| &item.id == id)?;
        self.items.remove(index);
        Some(self.begin_full())
    }

    /// Applies a new container width; starts a full pass if the column count changed.
    pub fn begin_resize(&mut self, container_width: f32) -> Option<PassTicket> {
        if !(container_width.is_finite() && container_width >= 0.0) {
            warn!(container_width, "Ignoring invalid container width");
            return None;
        }
        self.container_width = container_width;
        let column_count = self.layout.column_count(container_width);
        if column_count == self.column_count {
            trace!(container_width, column_count, "Resize kept column count");
            return None;
        }
        debug!(
            from = self.column_count,
            to = column_count,
            "Column count changed"
        );
        self.column_count = column_count;
        Some(self.begin_full())
    }

    /// Commits `ticket` with metric outcomes aligned to `ticket.items()`.
    pub fn commit(&mut self, ticket: PassTicket, outcomes: &[MetricOutcome]) -> PassOutcome {
        if ticket.token != self.pass {
            debug!(
                pass = ticket.token,
                current = self.pass,
                "Discarding stale layout pass"
            );
            return PassOutcome::Superseded {
                token: ticket.token,
                current: self.pass,
            };
        }

        let item_width = self.layout.item_width;
        let fallback = self.fallback_height;
        let footprints = ticket.items.into_iter().enumerate().map(|(index, item)| {
            let height = outcomes
                .get(index)
                .copied()
                .unwrap_or(MetricOutcome::Failed)
                .height_at(item_width, fallback);
            (item.id, height)
        });

        match ticket.kind {
            PassKind::Full => {
                let (placements, heights) = pack(&self.layout, ticket.column_count, footprints);
                self.placements = placements;
                self.heights = heights;
            }
            PassKind::Append => {
                for (id, height) in footprints {
                    let placement = self.heights.place(&self.layout, id, height);
                    self.placements.push(placement);
                }
            }
        }
        self.committed = ticket.token;

        let snapshot = self.snapshot();
        debug!(
            pass = snapshot.pass,
            items = snapshot.placements.len(),
            columns = snapshot.column_count,
            total_height = snapshot.total_height,
            "Committed layout pass"
        );
        PassOutcome::Committed(snapshot)
    }

    /// Current committed layout.
    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            pass: self.committed,
            column_count: self.heights.len(),
            columns: self.heights.columns(),
            placements: self.placements.clone(),
            total_height: self.heights.total_height(),
        }
    }

    pub fn total_height(&self) -> f32 {
        self.heights.total_height()
    }

    /// Drops every item and placement. Further passes start from empty.
    pub fn clear(&mut self) {
        self.items.clear();
        self.placements.clear();
        self.heights.reset(self.column_count);
        // Invalidate anything still in flight.
        self.pass += 1;
        self.committed = self.pass;
    }
}
