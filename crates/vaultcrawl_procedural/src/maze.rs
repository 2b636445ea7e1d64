//! # Maze Carving
//!
//! Randomized depth-first search over the full grid produces a perfect maze:
//! a spanning tree, so every cell reaches every other through base passages
//! and the base carve has no cycles. `braid` then knocks out a few extra
//! walls, preferring dead ends.
//!
//! Every carve writes both sides of the wall.

use rand::Rng;

use vaultcrawl_core::{Direction, Passages};

use crate::grid::neighbor_index;

/// Opens the wall between `index` and its neighbor in `dir`.
fn carve(passages: &mut [Passages], index: usize, next: usize, dir: Direction) {
    passages[index].insert(dir);
    passages[next].insert(dir.opposite());
}

/// Carves a spanning-tree maze over a `width x height` grid.
#[must_use]
pub fn carve_perfect_maze<R: Rng>(width: usize, height: usize, rng: &mut R) -> Vec<Passages> {
    let cells = width * height;
    let mut passages = vec![Passages::NONE; cells];
    if cells == 0 {
        return passages;
    }

    let mut visited = vec![false; cells];
    let start = rng.gen_range(0..cells);
    visited[start] = true;
    let mut stack = Vec::with_capacity(cells);
    stack.push(start);

    while let Some(&cell) = stack.last() {
        let mut options = [Direction::North; 4];
        let mut count = 0;
        for dir in Direction::ALL {
            if let Some(next) = neighbor_index(width, height, cell, dir) {
                if !visited[next] {
                    options[count] = dir;
                    count += 1;
                }
            }
        }

        if count == 0 {
            stack.pop();
            continue;
        }

        let dir = options[rng.gen_range(0..count)];
        if let Some(next) = neighbor_index(width, height, cell, dir) {
            carve(&mut passages, cell, next, dir);
            visited[next] = true;
            stack.push(next);
        }
    }

    passages
}

/// Opens `extra` additional walls, returning how many were opened.
///
/// Dead ends are preferred so loops replace cul-de-sacs.
pub fn braid<R: Rng>(
    passages: &mut [Passages],
    width: usize,
    height: usize,
    extra: usize,
    rng: &mut R,
) -> usize {
    let cells = width * height;
    if cells < 2 || extra == 0 {
        return 0;
    }

    let mut opened = 0;
    let mut attempts = extra * 8;
    while opened < extra && attempts > 0 {
        attempts -= 1;
        let cell = rng.gen_range(0..cells);
        // Half the attempts insist on a dead end.
        if attempts % 2 == 0 && passages[cell].count() != 1 {
            continue;
        }

        let mut closed = [Direction::North; 4];
        let mut count = 0;
        for dir in Direction::ALL {
            if !passages[cell].contains(dir) && neighbor_index(width, height, cell, dir).is_some() {
                closed[count] = dir;
                count += 1;
            }
        }
        if count == 0 {
            continue;
        }

        let dir = closed[rng.gen_range(0..count)];
        if let Some(next) = neighbor_index(width, height, cell, dir) {
            carve(passages, cell, next, dir);
            opened += 1;
        }
    }
    opened
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::LayoutSeed;

    fn open_edges(passages: &[Passages]) -> usize {
        // Each open wall is counted from both sides.
        passages.iter().map(|p| p.count() as usize).sum::<usize>() / 2
    }

    #[test]
    fn test_perfect_maze_is_a_tree() {
        for (w, h) in [(1, 1), (2, 1), (5, 5), (7, 3), (16, 16)] {
            let mut rng = LayoutSeed::new(7).rng();
            let passages = carve_perfect_maze(w, h, &mut rng);
            assert_eq!(passages.len(), w * h);
            assert_eq!(open_edges(&passages), w * h - 1, "{w}x{h} should have n-1 edges");
        }
    }

    #[test]
    fn test_braid_adds_cycles() {
        let mut rng = LayoutSeed::new(99).rng();
        let mut passages = carve_perfect_maze(10, 10, &mut rng);
        let opened = braid(&mut passages, 10, 10, 6, &mut rng);
        assert!(opened > 0);
        assert_eq!(open_edges(&passages), 99 + opened);
    }

    #[test]
    fn test_braid_on_single_cell_is_noop() {
        let mut rng = LayoutSeed::new(1).rng();
        let mut passages = carve_perfect_maze(1, 1, &mut rng);
        assert_eq!(braid(&mut passages, 1, 1, 5, &mut rng), 0);
        assert_eq!(passages[0], Passages::NONE);
    }
}
