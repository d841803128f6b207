use super::PhotoId;

/// Final screen position of one item in the column grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub id: PhotoId,
    pub column: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Placement {
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// A column's running height during a layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutColumn {
    pub index: usize,
    pub height: f32,
}

/// Immutable result of a committed layout pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutSnapshot {
    /// Pass token of the pass that produced this snapshot.
    pub pass: u64,
    pub column_count: usize,
    pub columns: Vec<LayoutColumn>,
    /// Placements in collection order.
    pub placements: Vec<Placement>,
    pub total_height: f32,
}

impl LayoutSnapshot {
    pub fn placement(&self, id: &PhotoId) -> Option<&Placement> {
        self.placements.iter().find(|p| &p.id == id)
    }

    /// Placements intersecting the vertical band `[top, bottom)`.
    pub fn visible(&self, top: f32, bottom: f32) -> impl Iterator<Item = &Placement> {
        self.placements
            .iter()
            .filter(move |p| p.y < bottom && p.bottom() > top)
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}
