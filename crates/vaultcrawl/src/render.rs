//! # Text Map
//!
//! ASCII rendering for the `map` and `big` commands.
//!
//! ```text
//! @  current room      -  |  passage between two discovered cells
//! #  discovered room   =  "  link door
//! .  discovered void
//! ?  undiscovered
//! ```

use vaultcrawl_core::{is_void_room, Direction};
use vaultcrawl_procedural::MazeLayout;

use crate::navigation::NavigationState;

/// Rectangle of cells to draw, `[x0, x1) x [y0, y1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapWindow {
    /// First column.
    pub x0: usize,
    /// First row.
    pub y0: usize,
    /// One past the last column.
    pub x1: usize,
    /// One past the last row.
    pub y1: usize,
}

impl MapWindow {
    /// Every cell of the grid.
    #[must_use]
    pub fn full(layout: &MazeLayout) -> Self {
        Self {
            x0: 0,
            y0: 0,
            x1: layout.width(),
            y1: layout.height(),
        }
    }

    /// Cells within `radius` columns and rows of cell `index`, cut to the
    /// grid.
    #[must_use]
    pub fn around(layout: &MazeLayout, index: usize, radius: usize) -> Self {
        let (x, y) = layout.coord(index);
        Self {
            x0: x.saturating_sub(radius),
            y0: y.saturating_sub(radius),
            x1: (x + radius + 1).min(layout.width()),
            y1: (y + radius + 1).min(layout.height()),
        }
    }
}

/// Draws `window` as seen by `nav`.
#[must_use]
pub fn render_map(layout: &MazeLayout, nav: &NavigationState, window: MapWindow) -> String {
    let current = nav.current_room().and_then(|room| layout.index_of(room));
    let seen = |index: usize| layout.room_at(index).is_some_and(|room| nav.is_discovered(room));
    let index_at = |x: usize, y: usize| y * layout.width() + x;

    let mut lines = Vec::with_capacity((window.y1 - window.y0) * 2);
    for y in window.y0..window.y1 {
        let mut row = String::new();
        let mut below = String::new();
        for x in window.x0..window.x1 {
            let index = index_at(x, y);
            row.push(glyph(layout, index, current, seen(index)));

            if x + 1 < window.x1 {
                let east = index_at(x + 1, y);
                row.push(connector(layout, index, Direction::East, seen(index) && seen(east), '-', '='));
            }
            if y + 1 < window.y1 {
                let south = index_at(x, y + 1);
                below.push(connector(layout, index, Direction::South, seen(index) && seen(south), '|', '"'));
                if x + 1 < window.x1 {
                    below.push(' ');
                }
            }
        }
        lines.push(row.trim_end().to_string());
        if y + 1 < window.y1 {
            lines.push(below.trim_end().to_string());
        }
    }
    lines.join("\n")
}

fn glyph(layout: &MazeLayout, index: usize, current: Option<usize>, seen: bool) -> char {
    if current == Some(index) {
        '@'
    } else if !seen {
        '?'
    } else if layout.room_at(index).is_some_and(is_void_room) {
        '.'
    } else {
        '#'
    }
}

fn connector(layout: &MazeLayout, index: usize, dir: Direction, visible: bool, open: char, door: char) -> char {
    if !visible || !layout.base_passages()[index].contains(dir) {
        ' '
    } else if layout.is_link_door(index, dir) {
        door
    } else {
        open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NavigationConfig;
    use vaultcrawl_core::{void_marker, DocumentGraph, DocumentNode, Passages};

    /// 2x2: a b / c void, passages a-b and a-c.
    fn square() -> MazeLayout {
        let n = Passages::from(Direction::North);
        let e = Passages::from(Direction::East);
        let s = Passages::from(Direction::South);
        let w = Passages::from(Direction::West);
        MazeLayout::from_parts(
            2,
            vec!["a.md".into(), "b.md".into(), "c.md".into(), void_marker(0)],
            vec![e.union(s), w, n, Passages::NONE],
            "square".into(),
        )
        .unwrap()
    }

    #[test]
    fn test_glyphs_and_connectors() {
        let mut layout = square();
        let mut graph = DocumentGraph::new();
        for id in ["a.md", "b.md", "c.md"] {
            graph.insert_node(DocumentNode::new(id, id)).unwrap();
        }
        graph.add_link("b.md", "a.md").unwrap();
        layout.update_link_openings(&graph);

        let mut nav = NavigationState::new(&NavigationConfig::default());
        nav.move_to_room(&layout, "a.md");

        let map = render_map(&layout, &nav, MapWindow::full(&layout));
        assert_eq!(map, "@=#\n|\n# ?");
    }

    #[test]
    fn test_window_is_cut_to_grid() {
        let layout = square();
        let window = MapWindow::around(&layout, 3, 4);
        assert_eq!(window, MapWindow { x0: 0, y0: 0, x1: 2, y1: 2 });
        assert_eq!(MapWindow::around(&layout, 0, 0), MapWindow { x0: 0, y0: 0, x1: 1, y1: 1 });
    }
}
