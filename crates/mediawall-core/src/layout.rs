//! Masonry geometry engine
//!
//! Pure, single-pass shortest-column packing. The whole layout is recomputed
//! from scratch whenever the item list, column count, or container width
//! changes; packing is not stable under insertions, so there is no
//! incremental repair path.

use crate::media::MediaItem;

/// Placement of one tile, in pixel space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub top: f64,
    pub left: f64,
    pub height: f64,
}

/// Result of a full layout pass
#[derive(Debug, Clone, Default)]
pub struct Layout {
    /// One position per item, indexed like the input sequence
    pub positions: Vec<Position>,
    /// Width every tile is rendered at
    pub column_width: f64,
    /// Height of the packed content including outer padding
    pub total_height: f64,
}

impl Layout {
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Width of a single column for the given container
#[inline]
pub fn column_width(container_width: f64, column_count: u32, gap: f64) -> f64 {
    ((container_width - gap * (column_count.saturating_sub(1)) as f64) / column_count as f64)
        .floor()
}

/// Pack `items` into `column_count` columns of `container_width` pixels.
///
/// Each item goes to the currently shortest column (ties break to the lowest
/// index). Tile height preserves the item's aspect ratio when known and
/// falls back to a square otherwise. Degenerate inputs yield an empty
/// layout, which callers must treat as "not yet renderable".
pub fn layout(
    items: &[MediaItem],
    column_count: u32,
    container_width: f64,
    gap: f64,
    padding: f64,
) -> Layout {
    if column_count == 0 || container_width <= 0.0 {
        return Layout::default();
    }

    let column_width = column_width(container_width, column_count, gap);
    let mut column_heights = vec![padding; column_count as usize];
    let mut positions = Vec::with_capacity(items.len());

    for item in items {
        let col = shortest_column(&column_heights);

        let height = match item.aspect_ratio() {
            Some(ratio) => (column_width * ratio).round(),
            None => column_width,
        };

        positions.push(Position {
            top: column_heights[col],
            left: padding + col as f64 * (column_width + gap),
            height,
        });

        column_heights[col] += height + gap;
    }

    let max_height = column_heights.iter().cloned().fold(f64::MIN, f64::max);

    Layout {
        positions,
        column_width,
        total_height: max_height + padding,
    }
}

/// Index of the column with the minimum accumulated height.
/// The first minimum wins so packing stays deterministic.
#[inline]
fn shortest_column(heights: &[f64]) -> usize {
    let mut best = 0;
    for (i, &h) in heights.iter().enumerate().skip(1) {
        if h < heights[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaKind;
    use chrono::Utc;

    fn item(id: i64, dims: Option<(u32, u32)>) -> MediaItem {
        MediaItem {
            id,
            path: format!("/media/{id}.jpg"),
            kind: MediaKind::Image,
            size_bytes: 1024,
            created_at: Utc::now(),
            width: dims.map(|d| d.0),
            height: dims.map(|d| d.1),
            duration_sec: None,
            starred: false,
        }
    }

    #[test]
    fn test_degenerate_inputs_yield_empty_layout() {
        let items = vec![item(1, None)];
        assert!(layout(&items, 0, 1000.0, 6.0, 30.0).is_empty());
        assert!(layout(&items, 5, 0.0, 6.0, 30.0).is_empty());
        assert!(layout(&items, 5, -10.0, 6.0, 30.0).is_empty());
    }

    #[test]
    fn test_column_width_and_square_fallback() {
        // container 1230 - 2*30 padding applied by the caller leaves 1170;
        // the engine receives the inner width: (1230-60) with 4 gaps of 6
        let items = vec![item(1, None)];
        let result = layout(&items, 5, 1170.0, 6.0, 30.0);
        assert_eq!(result.column_width, 229.0);
        // unknown dimensions fall back to a square tile
        assert_eq!(result.positions[0].height, 229.0);
        assert_eq!(result.positions[0].top, 30.0);
        assert_eq!(result.positions[0].left, 30.0);
    }

    #[test]
    fn test_every_item_lands_in_the_shortest_column() {
        // Tall item in column 0, then squares should fill columns 1, 2
        // before column 0 receives another tile.
        let items = vec![
            item(1, Some((100, 400))),
            item(2, Some((100, 100))),
            item(3, Some((100, 100))),
            item(4, Some((100, 100))),
        ];
        let result = layout(&items, 3, 312.0, 6.0, 0.0);
        let cw = result.column_width;

        assert_eq!(result.positions[0].left, 0.0);
        assert_eq!(result.positions[1].left, cw + 6.0);
        assert_eq!(result.positions[2].left, 2.0 * (cw + 6.0));
        // item 4 goes back to column 1 (first shortest), not column 0
        assert_eq!(result.positions[3].left, cw + 6.0);
    }

    #[test]
    fn test_ties_break_to_lowest_column_index() {
        let items = vec![item(1, Some((100, 100))), item(2, Some((100, 100)))];
        let result = layout(&items, 4, 400.0, 0.0, 0.0);
        assert_eq!(result.positions[0].left, 0.0);
        assert_eq!(result.positions[1].left, result.column_width);
    }

    #[test]
    fn test_total_height_tracks_tallest_column() {
        let items = vec![
            item(1, Some((100, 300))),
            item(2, Some((100, 50))),
            item(3, Some((100, 50))),
        ];
        let padding = 10.0;
        let gap = 4.0;
        let result = layout(&items, 2, 200.0, gap, padding);
        let cw = result.column_width;

        // column 0: padding + 3*cw + gap; column 1: two half-height tiles
        let col0 = padding + 3.0 * cw + gap;
        assert_eq!(result.total_height, col0 + padding);
        for pos in &result.positions {
            assert!(pos.top < result.total_height);
        }
    }

    #[test]
    fn test_layout_is_deterministic() {
        let items: Vec<MediaItem> = (0..40)
            .map(|i| item(i, if i % 3 == 0 { None } else { Some((100, 60 + (i as u32 * 17) % 200)) }))
            .collect();

        let a = layout(&items, 5, 1170.0, 6.0, 30.0);
        let b = layout(&items, 5, 1170.0, 6.0, 30.0);
        assert_eq!(a.positions, b.positions);
        assert_eq!(a.total_height, b.total_height);
    }
}
