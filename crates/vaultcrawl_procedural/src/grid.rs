//! Grid sizing and neighbor arithmetic.

use vaultcrawl_core::Direction;

/// Index of the cell one step from `index` in `dir`, or `None` at the edge.
#[inline]
#[must_use]
pub fn neighbor_index(width: usize, height: usize, index: usize, dir: Direction) -> Option<usize> {
    let x = index % width;
    let y = index / width;
    match dir {
        Direction::North if y > 0 => Some(index - width),
        Direction::South if y + 1 < height => Some(index + width),
        Direction::West if x > 0 => Some(index - 1),
        Direction::East if x + 1 < width => Some(index + 1),
        _ => None,
    }
}

/// Chooses `(width, height)` for `document_count` rooms.
///
/// The target cell count is `ceil(document_count * sparsity)` capped at
/// `max_cells`, but never below `document_count`. Width is the ceiling square
/// root of the target; height covers the rest. The final grid
/// (`width * height`) may exceed the target by less than one row.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn grid_dimensions(document_count: usize, sparsity: f64, max_cells: usize) -> (usize, usize) {
    let scaled = (document_count as f64 * sparsity.max(1.0)).ceil() as usize;
    let target = scaled.min(max_cells).max(document_count).max(1);

    let mut width = (target as f64).sqrt().ceil() as usize;
    while width * width < target {
        width += 1;
    }
    while width > 1 && (width - 1) * (width - 1) >= target {
        width -= 1;
    }
    let height = target.div_ceil(width);
    (width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbors_respect_edges() {
        // 3x2 grid:
        // 0 1 2
        // 3 4 5
        assert_eq!(neighbor_index(3, 2, 0, Direction::North), None);
        assert_eq!(neighbor_index(3, 2, 0, Direction::West), None);
        assert_eq!(neighbor_index(3, 2, 0, Direction::East), Some(1));
        assert_eq!(neighbor_index(3, 2, 0, Direction::South), Some(3));
        assert_eq!(neighbor_index(3, 2, 5, Direction::East), None);
        assert_eq!(neighbor_index(3, 2, 5, Direction::South), None);
        assert_eq!(neighbor_index(3, 2, 5, Direction::North), Some(2));
        assert_eq!(neighbor_index(3, 2, 2, Direction::East), None);
    }

    #[test]
    fn test_dimensions_cover_every_document() {
        for n in 1..300 {
            let (w, h) = grid_dimensions(n, 1.35, 4096);
            assert!(w * h >= n, "{n} documents in {w}x{h}");
            assert!(w >= h, "grid should not be taller than wide: {w}x{h}");
        }
    }

    #[test]
    fn test_max_cells_never_drops_documents() {
        let (w, h) = grid_dimensions(100, 2.0, 10);
        assert!(w * h >= 100);
        assert_eq!(w, 10);
    }

    #[test]
    fn test_single_document() {
        assert_eq!(grid_dimensions(1, 1.35, 4096), (2, 1));
        assert_eq!(grid_dimensions(1, 1.0, 4096), (1, 1));
        assert_eq!(grid_dimensions(0, 1.35, 4096), (1, 1));
    }
}
