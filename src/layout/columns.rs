use crate::models::{LayoutColumn, PhotoId, Placement};

/// Upper bound on the column count, however wide the container.
pub const MAX_COLUMNS: usize = 1024;

/// Geometry of the column grid.
///
/// Columns have a fixed width; the number of columns follows the container
/// width. Items are stacked into the currently shortest column.
#[derive(Debug, Clone)]
pub struct ColumnLayout {
    /// Width of every column in pixels.
    pub item_width: f32,
    /// Horizontal gap between columns and vertical gap below each item.
    pub gutter: f32,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            item_width: 300.0,
            gutter: 10.0,
        }
    }
}

impl ColumnLayout {
    pub fn new(item_width: f32, gutter: f32) -> Self {
        Self { item_width, gutter }
    }

    /// Number of columns that fit into `container_width`, in `1..=MAX_COLUMNS`.
    pub fn column_count(&self, container_width: f32) -> usize {
        let stride = self.item_width + self.gutter;
        if !(container_width.is_finite() && stride > 0.0) {
            return 1;
        }
        let count = ((container_width + self.gutter) / stride).floor();
        if count < 1.0 {
            1
        } else if count >= MAX_COLUMNS as f32 {
            MAX_COLUMNS
        } else {
            count as usize
        }
    }

    pub fn column_x(&self, column: usize) -> f32 {
        column as f32 * (self.item_width + self.gutter)
    }
}

/// Running per-column heights for one layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnHeights {
    heights: Vec<f32>,
}

impl ColumnHeights {
    pub fn new(column_count: usize) -> Self {
        Self {
            heights: vec![0.0; column_count.max(1)],
        }
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Index of the shortest column; ties go to the lowest index.
    pub fn shortest(&self) -> usize {
        let mut best = 0;
        for (index, height) in self.heights.iter().enumerate().skip(1) {
            if *height < self.heights[best] {
                best = index;
            }
        }
        best
    }

    /// Places an item of `height` into the shortest column.
    pub fn place(&mut self, layout: &ColumnLayout, id: PhotoId, height: f32) -> Placement {
        let column = self.shortest();
        let y = self.heights[column];
        self.heights[column] += height + layout.gutter;
        Placement {
            id,
            column,
            x: layout.column_x(column),
            y,
            width: layout.item_width,
            height,
        }
    }

    pub fn total_height(&self) -> f32 {
        self.heights.iter().copied().fold(0.0, f32::max)
    }

    pub fn columns(&self) -> Vec<LayoutColumn> {
        self.heights
            .iter()
            .enumerate()
            .map(|(index, height)| LayoutColumn {
                index,
                height: *height,
            })
            .collect()
    }

    pub fn reset(&mut self, column_count: usize) {
        self.heights.clear();
        self.heights.resize(column_count.max(1), 0.0);
    }
}

/// Packs `items` (id, footprint height) in order into `column_count` columns.
pub fn pack(
    layout: &ColumnLayout,
    column_count: usize,
    items: impl IntoIterator<Item = (PhotoId, f32)>,
) -> (Vec<Placement>, ColumnHeights) {
    let mut heights = ColumnHeights::new(column_count);
    let placements = items
        .into_iter()
        .map(|(id, height)| heights.place(layout, id, height))
        .collect();
    (placements, heights)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(heights: &[f32]) -> Vec<(PhotoId, f32)> {
        heights
            .iter()
            .enumerate()
            .map(|(i, h)| (PhotoId::from(format!("{i}")), *h))
            .collect()
    }

    #[test]
    fn test_column_count() {
        let layout = ColumnLayout::new(300.0, 10.0);
        assert_eq!(layout.column_count(610.0), 2);
        assert_eq!(layout.column_count(609.0), 1);
        assert_eq!(layout.column_count(930.0), 3);
        // Narrower than a single column still yields one column.
        assert_eq!(layout.column_count(120.0), 1);
        assert_eq!(layout.column_count(0.0), 1);
        assert_eq!(layout.column_count(f32::NAN), 1);
    }

    #[test]
    fn test_column_count_is_capped() {
        let layout = ColumnLayout::new(300.0, 10.0);
        assert_eq!(layout.column_count(f32::MAX), MAX_COLUMNS);
        assert_eq!(layout.column_count(3.0e12), MAX_COLUMNS);
        assert_eq!(layout.column_count(f32::INFINITY), 1);

        let (_, heights) = pack(&layout, layout.column_count(f32::MAX), ids(&[10.0]));
        assert_eq!(heights.len(), MAX_COLUMNS);
    }

    #[test]
    fn test_empty_items() {
        let layout = ColumnLayout::default();
        let (placements, heights) = pack(&layout, 3, Vec::new());
        assert!(placements.is_empty());
        assert_eq!(heights.total_height(), 0.0);
    }

    #[test]
    fn test_three_items_two_columns() {
        let layout = ColumnLayout::new(300.0, 10.0);
        let (placements, heights) = pack(&layout, 2, ids(&[100.0, 50.0, 120.0]));

        let columns: Vec<usize> = placements.iter().map(|p| p.column).collect();
        assert_eq!(columns, vec![0, 1, 1]);
        assert_eq!((placements[1].x, placements[1].y), (310.0, 0.0));
        assert_eq!((placements[2].x, placements[2].y), (310.0, 60.0));

        let columns = heights.columns();
        assert!((columns[0].height - 110.0).abs() < 0.01);
        assert!((columns[1].height - 190.0).abs() < 0.01);
        assert!((heights.total_height() - 190.0).abs() < 0.01);
    }

    #[test]
    fn test_ties_go_to_lowest_index() {
        let layout = ColumnLayout::new(100.0, 0.0);
        let (placements, _) = pack(&layout, 3, ids(&[50.0, 50.0, 50.0, 50.0]));
        let columns: Vec<usize> = placements.iter().map(|p| p.column).collect();
        assert_eq!(columns, vec![0, 1, 2, 0]);
    }

    #[test]
    fn test_order_is_preserved_not_sorted() {
        let layout = ColumnLayout::new(100.0, 0.0);
        let (placements, _) = pack(&layout, 2, ids(&[10.0, 500.0, 20.0, 30.0]));
        let order: Vec<&str> = placements.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(order, vec!["0", "1", "2", "3"]);
        // 2 and 3 both land under the short first item.
        assert_eq!(placements[2].column, 0);
        assert_eq!(placements[3].column, 0);
    }

    #[test]
    fn test_total_height_is_max_column() {
        let layout = ColumnLayout::new(200.0, 8.0);
        let heights_in: Vec<f32> = (0..37).map(|i| 40.0 + (i * 37 % 11) as f32 * 13.0).collect();
        for column_count in 1..6 {
            let (placements, heights) = pack(&layout, column_count, ids(&heights_in));
            assert_eq!(placements.len(), heights_in.len());
            let max_bottom = placements
                .iter()
                .map(|p| p.bottom() + layout.gutter)
                .fold(0.0, f32::max);
            assert!((heights.total_height() - max_bottom).abs() < 0.01);
            assert!(placements.iter().all(|p| p.column < column_count));
        }
    }

    #[test]
    fn test_packing_is_deterministic() {
        let layout = ColumnLayout::default();
        let input = ids(&[120.0, 80.0, 80.0, 200.0, 10.0]);
        let first = pack(&layout, 3, input.clone());
        let second = pack(&layout, 3, input);
        assert_eq!(first, second);
    }
}
