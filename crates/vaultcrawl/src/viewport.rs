//! # Map Viewport
//!
//! Pure coordinate math over the layout grid. Cell `(x, y)` covers
//! `[x * cell_size, (x + 1) * cell_size)` horizontally, likewise vertically.
//!
//! A viewport remembers the signature of the layout it was computed for.
//! [`MapViewport::is_stale`] tells a caller to refit instead of reusing a box
//! drawn over a superseded grid.

use serde::{Deserialize, Serialize};
use vaultcrawl_procedural::MazeLayout;

use crate::config::ViewportConfig;

/// Smallest extent [`ViewBox::clamped`] will produce.
const MIN_POSITIVE_EXTENT: f64 = 1e-3;

/// A view box in layout units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewBox {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl ViewBox {
    /// Creates a box.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Same size, moved so its center is `(cx, cy)`.
    #[must_use]
    pub fn centered_at(&self, cx: f64, cy: f64) -> Self {
        Self::new(cx - self.width / 2.0, cy - self.height / 2.0, self.width, self.height)
    }

    /// Clamps each extent into `[min, max]`, keeping the center.
    ///
    /// Non-finite or non-positive sizes collapse to `min`; the result always
    /// has strictly positive width and height.
    #[must_use]
    pub fn clamped(&self, min: f64, max: f64) -> Self {
        let min = if min.is_finite() { min.max(MIN_POSITIVE_EXTENT) } else { MIN_POSITIVE_EXTENT };
        let max = if max.is_finite() { max.max(min) } else { min };
        let fix = |extent: f64| {
            if extent.is_finite() && extent > 0.0 {
                extent.clamp(min, max)
            } else {
                min
            }
        };
        let (cx, cy) = self.center();
        let (cx, cy) = (
            if cx.is_finite() { cx } else { 0.0 },
            if cy.is_finite() { cy } else { 0.0 },
        );
        Self::new(0.0, 0.0, fix(self.width), fix(self.height)).centered_at(cx, cy)
    }
}

/// A pannable, zoomable view over one layout.
#[derive(Clone, Debug, PartialEq)]
pub struct MapViewport {
    config: ViewportConfig,
    view: ViewBox,
    signature: Option<String>,
    grid: (usize, usize),
}

impl MapViewport {
    /// Creates a viewport that has not been fitted to any layout.
    #[must_use]
    pub fn new(config: ViewportConfig) -> Self {
        let side = config.min_extent * config.cell_size;
        Self {
            view: ViewBox::new(0.0, 0.0, side, side),
            config,
            signature: None,
            grid: (0, 0),
        }
    }

    /// Current view box.
    #[must_use]
    pub fn view(&self) -> ViewBox {
        self.view
    }

    /// Signature of the layout this view was computed for.
    #[must_use]
    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    /// Returns true if the view was not computed for `layout`.
    #[must_use]
    pub fn is_stale(&self, layout: &MazeLayout) -> bool {
        self.signature.as_deref() != Some(layout.signature())
    }

    /// Encloses the whole grid plus padding.
    pub fn fit(&mut self, layout: &MazeLayout) -> ViewBox {
        let cs = self.config.cell_size;
        let pad = self.config.padding;
        self.grid = (layout.width(), layout.height());
        self.signature = Some(layout.signature().to_string());
        #[allow(clippy::cast_precision_loss)]
        let (w, h) = (layout.width() as f64 * cs, layout.height() as f64 * cs);
        self.view = ViewBox::new(-pad, -pad, w + 2.0 * pad, h + 2.0 * pad);
        self.view
    }

    /// Re-centers the current box on `room`'s cell. Unknown rooms leave the
    /// view unchanged. A stale view is refitted first.
    pub fn center_on(&mut self, layout: &MazeLayout, room: &str) -> ViewBox {
        if self.is_stale(layout) {
            self.fit(layout);
        }
        if let Some((x, y)) = layout.coord_of(room) {
            let cs = self.config.cell_size;
            #[allow(clippy::cast_precision_loss)]
            let (cx, cy) = ((x as f64 + 0.5) * cs, (y as f64 + 0.5) * cs);
            self.view = self.view.centered_at(cx, cy);
        }
        self.view
    }

    /// Scales about the center. `factor > 1` zooms in.
    ///
    /// Non-finite or non-positive factors are ignored.
    pub fn zoom(&mut self, factor: f64) -> ViewBox {
        if factor.is_finite() && factor > 0.0 {
            let (cx, cy) = self.view.center();
            let scaled = ViewBox::new(0.0, 0.0, self.view.width / factor, self.view.height / factor)
                .centered_at(cx, cy);
            self.view = self.clamp(scaled);
        }
        self.view
    }

    /// Moves the origin by a drag delta.
    pub fn pan(&mut self, dx: f64, dy: f64) -> ViewBox {
        if dx.is_finite() && dy.is_finite() {
            self.view.x += dx;
            self.view.y += dy;
        }
        self.view
    }

    /// Clamps `view` to the extents allowed for the fitted grid.
    #[must_use]
    pub fn clamp(&self, view: ViewBox) -> ViewBox {
        let (min, max) = self.extent_bounds();
        view.clamped(min, max)
    }

    /// `(min, max)` extent: `min_extent` cells up to the fitted grid times
    /// `max_extent_factor` plus padding.
    #[must_use]
    pub fn extent_bounds(&self) -> (f64, f64) {
        let cs = self.config.cell_size;
        let min = self.config.min_extent * cs;
        #[allow(clippy::cast_precision_loss)]
        let longest = self.grid.0.max(self.grid.1) as f64 * cs;
        let max = longest * self.config.max_extent_factor + 2.0 * self.config.padding;
        (min, max.max(min))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vaultcrawl_core::{void_marker, Passages};

    fn layout(width: usize, height: usize, signature: &str) -> MazeLayout {
        let rooms = (0..width * height).map(void_marker).collect();
        MazeLayout::from_parts(width, rooms, vec![Passages::NONE; width * height], signature.into())
            .unwrap()
    }

    #[test]
    fn test_fit_encloses_grid() {
        let layout = layout(4, 3, "sig-a");
        let mut viewport = MapViewport::new(ViewportConfig::default());
        assert!(viewport.is_stale(&layout));

        let view = viewport.fit(&layout);
        assert_eq!(view, ViewBox::new(-0.5, -0.5, 5.0, 4.0));
        assert!(!viewport.is_stale(&layout));
        assert_eq!(viewport.fit(&layout), view);
    }

    #[test]
    fn test_center_on_room() {
        let layout = layout(4, 3, "sig-a");
        let mut viewport = MapViewport::new(ViewportConfig::default());
        viewport.fit(&layout);

        let room = void_marker(6); // (2, 1)
        let view = viewport.center_on(&layout, &room);
        assert_eq!(view.center(), (2.5, 1.5));
        assert_eq!((view.width, view.height), (5.0, 4.0));

        let unchanged = viewport.center_on(&layout, "missing.md");
        assert_eq!(unchanged, view);
    }

    #[test]
    fn test_zoom_clamps_extents() {
        let layout = layout(4, 4, "sig-a");
        let mut viewport = MapViewport::new(ViewportConfig::default());
        viewport.fit(&layout);
        let (min, max) = viewport.extent_bounds();
        assert_eq!(min, 3.0);
        assert_eq!(max, 7.0);

        let view = viewport.zoom(100.0);
        assert_eq!((view.width, view.height), (min, min));
        let view = viewport.zoom(0.001);
        assert_eq!((view.width, view.height), (max, max));
        assert_eq!(view.center(), (2.0, 2.0));

        let before = viewport.view();
        assert_eq!(viewport.zoom(f64::NAN), before);
        assert_eq!(viewport.zoom(-2.0), before);
    }

    #[test]
    fn test_pan_accumulates() {
        let layout = layout(2, 2, "sig-a");
        let mut viewport = MapViewport::new(ViewportConfig::default());
        viewport.fit(&layout);
        viewport.pan(1.0, -0.5);
        let view = viewport.pan(0.5, 0.25);
        assert_eq!((view.x, view.y), (1.0, -0.75));
    }

    #[test]
    fn test_clamped_never_degenerates() {
        let view = ViewBox::new(1.0, 1.0, 0.0, f64::NAN).clamped(0.0, 10.0);
        assert!(view.width > 0.0 && view.height > 0.0);
        let view = ViewBox::new(f64::INFINITY, 0.0, -4.0, 2.0).clamped(1.0, 3.0);
        assert_eq!((view.width, view.height), (1.0, 2.0));
        assert!(view.x.is_finite());
    }

    #[test]
    fn test_new_layout_makes_view_stale() {
        let mut viewport = MapViewport::new(ViewportConfig::default());
        viewport.fit(&layout(2, 2, "sig-a"));
        let next = layout(3, 3, "sig-b");
        assert!(viewport.is_stale(&next));
        viewport.center_on(&next, &void_marker(4));
        assert_eq!(viewport.signature(), Some("sig-b"));
    }
}
