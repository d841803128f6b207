//! Chooses which collection a viewer session navigates.
//!
//! Precedence on activation:
//! 1. A series parent opens its own series, capped at the configured size.
//! 2. A per-author host view opens the author's photos from the batch.
//! 3. Otherwise the whole batch of the active view.

use tracing::debug;

use crate::models::PhotoItem;

/// The host view active when an item was activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostView {
    /// The shared feed of everyone's photos.
    Feed,
    /// The signed-in user's own portfolio.
    Portfolio { author_id: String },
    /// Another author's works.
    Author {
        author_id: String,
        author_name: String,
    },
}

impl HostView {
    pub fn is_per_author(&self) -> bool {
        matches!(self, Self::Portfolio { .. } | Self::Author { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    Series,
    Author,
    View,
}

/// Which collection governs navigation, and where to return on close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationContext {
    kind: ContextKind,
    /// Series parent id or author id.
    scope_id: Option<String>,
    /// Display name for the scope, if any.
    scope_label: Option<String>,
    return_view: HostView,
}

impl NavigationContext {
    pub fn kind(&self) -> ContextKind {
        self.kind
    }

    pub fn scope_id(&self) -> Option<&str> {
        self.scope_id.as_deref()
    }

    pub fn scope_label(&self) -> Option<&str> {
        self.scope_label.as_deref()
    }

    /// The view captured at activation time.
    pub fn return_view(&self) -> &HostView {
        &self.return_view
    }

    pub(crate) fn into_return_view(self) -> HostView {
        self.return_view
    }
}

/// Governing array plus starting position for a new session.
#[derive(Debug, Clone)]
pub struct Selection {
    pub context: NavigationContext,
    pub items: Vec<PhotoItem>,
    pub index: usize,
}

/// Resolves the governing collection for an activation of `item`.
pub fn select(
    item: &PhotoItem,
    batch: &[PhotoItem],
    is_series: bool,
    host_view: &HostView,
    max_series_size: usize,
) -> Selection {
    let return_view = host_view.clone();

    if is_series {
        if let Some(series) = item.series.as_ref().filter(|s| !s.is_empty()) {
            let members: Vec<PhotoItem> = series
                .members
                .iter()
                .take(max_series_size.max(1))
                .cloned()
                .collect();
            // The parent stands for the whole series, so an absent parent starts at the top.
            let index = members
                .iter()
                .position(|m| m.id == item.id)
                .unwrap_or(0);
            debug!(
                series = %series.parent_id,
                members = members.len(),
                total = series.len(),
                "Selected series context"
            );
            return Selection {
                context: NavigationContext {
                    kind: ContextKind::Series,
                    scope_id: Some(series.parent_id.to_string()),
                    scope_label: item.caption.title.clone(),
                    return_view,
                },
                items: members,
                index,
            };
        }
    }

    let (kind, scope_id, scope_label, items) = if host_view.is_per_author() {
        let author_id = item.author_id();
        let siblings: Vec<PhotoItem> = batch
            .iter()
            .filter(|candidate| candidate.author_id() == author_id)
            .cloned()
            .collect();
        (
            ContextKind::Author,
            Some(author_id.to_string()),
            Some(item.attribution.author_name.clone()),
            siblings,
        )
    } else {
        (ContextKind::View, None, None, batch.to_vec())
    };

    let (items, index) = match items.iter().position(|candidate| candidate.id == item.id) {
        Some(index) => (items, index),
        None => {
            debug!(id = %item.id, "Activated item not in batch, navigating it alone");
            (vec![item.clone()], 0)
        }
    };

    debug!(?kind, items = items.len(), index, "Selected navigation context");
    Selection {
        context: NavigationContext {
            kind,
            scope_id,
            scope_label,
            return_view,
        },
        items,
        index,
    }
}
