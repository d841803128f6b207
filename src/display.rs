//! Text content for grid overlays, viewer captions and empty states.
//!
//! What a grid tile shows depends on the host view: the feed credits the
//! author, per-author views show the photo's own details instead.

use crate::models::PhotoItem;
use crate::viewer::{ContextKind, HostView, ViewerSession};

/// Overlay text drawn over a grid tile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overlay {
    pub heading: Option<String>,
    pub details: Vec<String>,
    /// Member count marker for series parents, e.g. "1/5".
    pub badge: Option<String>,
}

/// Builds the overlay for `item` in `view`.
pub fn overlay_for(item: &PhotoItem, view: &HostView, max_series_size: usize) -> Overlay {
    let badge = item
        .is_series_parent()
        .then(|| item.series.as_ref().map(|s| s.len().min(max_series_size)))
        .flatten()
        .map(|count| format!("1/{count}"));

    match view {
        HostView::Feed => Overlay {
            heading: Some(item.attribution.author_name.clone()),
            details: item.caption.title.iter().cloned().collect(),
            badge,
        },
        HostView::Author { .. } => Overlay {
            heading: item.caption.title.clone(),
            details: detail_lines(item),
            badge,
        },
        HostView::Portfolio { .. } => Overlay {
            heading: Some(
                item.caption
                    .title
                    .clone()
                    .unwrap_or_else(|| "Untitled".to_string()),
            ),
            details: detail_lines(item),
            badge,
        },
    }
}

fn detail_lines(item: &PhotoItem) -> Vec<String> {
    item.caption
        .settings
        .iter()
        .chain(item.caption.location.iter())
        .cloned()
        .collect()
}

/// Caption lines shown under the photo in the viewer.
pub fn caption_lines(item: &PhotoItem) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(title) = &item.caption.title {
        lines.push(title.clone());
    }
    lines.push(format!("by {}", item.attribution.author_name));
    lines.extend(detail_lines(item));
    lines
}

/// "N / total" position text, qualified by the governing collection.
pub fn indicator(session: &ViewerSession) -> String {
    let position = format!("{} / {}", session.index() + 1, session.len());
    let context = session.context();
    match context.kind() {
        ContextKind::Series => format!("Series {position}"),
        ContextKind::Author => match context.scope_label() {
            Some(name) => format!("{name} {position}"),
            None => format!("Author {position}"),
        },
        ContextKind::View => position,
    }
}

/// Message shown when a view has nothing to lay out.
pub fn empty_state(view: &HostView) -> String {
    match view {
        HostView::Feed => "No photos yet. Be the first to share one.".to_string(),
        HostView::Portfolio { .. } => "You haven't uploaded any photos yet.".to_string(),
        HostView::Author { author_name, .. } => {
            format!("{author_name} hasn't shared any photos yet.")
        }
    }
}
