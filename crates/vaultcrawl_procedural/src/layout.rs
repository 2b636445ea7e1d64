//! # Maze Layout
//!
//! Maps documents onto a 2-D grid and carves the maze between them.
//!
//! ## Lifecycle
//!
//! A layout is computed once per distinct document-id set. Its signature
//! (format version, cell count, count and hash of the sorted ids) is the
//! cache key: while a persisted layout's signature matches, it is reused
//! verbatim so the maze a player has memorized never shuffles.
//!
//! When the id set changes the signature goes stale. Ids still present keep
//! their previous cell where the new grid has room for it; everything else
//! is placed fresh and the passages are carved from the new seed.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use vaultcrawl_core::{is_void_room, void_marker, Direction, DocumentGraph, Passages, RoomId};

use crate::error::{LayoutError, LayoutResult};
use crate::grid::{grid_dimensions, neighbor_index};
use crate::hash::{hash_id_list, LayoutSeed};
use crate::maze::{braid, carve_perfect_maze};
use crate::persisted::PersistedLayout;

/// Format version written into signatures and persisted records.
pub const LAYOUT_VERSION: u32 = 2;

/// Tuning for grid sizing and carving.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Upper bound on the target cell count. Never drops a document.
    pub max_cells: usize,
    /// Cells per document before the cap applies (>= 1.0).
    pub sparsity: f64,
    /// Extra passages as a fraction of the cell count, in `[0, 1]`.
    pub braid_ratio: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_cells: 4096,
            sparsity: 1.35,
            braid_ratio: 0.06,
        }
    }
}

/// Builds the cache key for a grid of `cell_count` cells holding `sorted_ids`.
#[must_use]
pub fn layout_signature<S: AsRef<str>>(cell_count: usize, sorted_ids: &[S]) -> String {
    format!(
        "v{LAYOUT_VERSION}:{cell_count}:{}:{:08x}",
        sorted_ids.len(),
        hash_id_list(sorted_ids)
    )
}

/// A generated maze over the document grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeLayout {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) room_order: Vec<RoomId>,
    pub(crate) base_passages: Vec<Passages>,
    pub(crate) link_open: Vec<Passages>,
    pub(crate) index_by_room: HashMap<RoomId, usize>,
    pub(crate) signature: String,
}

impl MazeLayout {
    /// Assembles and validates a layout. Link doors start closed.
    ///
    /// # Errors
    ///
    /// Fails on inconsistent lengths, duplicate rooms, or passages that are
    /// one-sided or open through the grid edge.
    pub fn from_parts(
        width: usize,
        room_order: Vec<RoomId>,
        base_passages: Vec<Passages>,
        signature: String,
    ) -> LayoutResult<Self> {
        let cell_count = room_order.len();
        if cell_count == 0 {
            return Err(LayoutError::Empty);
        }
        if width == 0 || cell_count % width != 0 {
            return Err(LayoutError::GridMismatch { width, cell_count });
        }
        if base_passages.len() != cell_count {
            return Err(LayoutError::LengthMismatch {
                expected: cell_count,
                rooms: cell_count,
                passages: base_passages.len(),
            });
        }

        let mut index_by_room = HashMap::with_capacity(cell_count);
        for (index, id) in room_order.iter().enumerate() {
            if index_by_room.insert(id.clone(), index).is_some() {
                return Err(LayoutError::DuplicateRoom(id.clone()));
            }
        }

        let layout = Self {
            width,
            height: cell_count / width,
            link_open: vec![Passages::NONE; cell_count],
            room_order,
            base_passages,
            index_by_room,
            signature,
        };
        layout.validate()?;
        Ok(layout)
    }

    /// Checks passage symmetry, grid edges and link-door backing.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> LayoutResult<()> {
        for index in 0..self.cell_count() {
            let base = self.base_passages[index];
            for dir in base.directions() {
                let Some(next) = self.neighbor(index, dir) else {
                    return Err(LayoutError::EdgePassage { index, direction: dir });
                };
                if !self.base_passages[next].contains(dir.opposite()) {
                    return Err(LayoutError::AsymmetricPassage { index, direction: dir });
                }
            }
            for dir in self.link_open[index].directions() {
                if !base.contains(dir) {
                    return Err(LayoutError::UnbackedLinkDoor { index, direction: dir });
                }
            }
        }
        Ok(())
    }

    /// Grid width.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total cells, `width * height`.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.room_order.len()
    }

    /// Cache key of this layout.
    #[must_use]
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Room id per cell, row-major.
    #[must_use]
    pub fn room_order(&self) -> &[RoomId] {
        &self.room_order
    }

    /// Structural passages per cell.
    #[must_use]
    pub fn base_passages(&self) -> &[Passages] {
        &self.base_passages
    }

    /// Link doors per cell.
    #[must_use]
    pub fn link_open_mask(&self) -> &[Passages] {
        &self.link_open
    }

    /// Number of cells holding a document.
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.room_order.iter().filter(|id| !is_void_room(id)).count()
    }

    /// Room in cell `index`.
    #[must_use]
    pub fn room_at(&self, index: usize) -> Option<&str> {
        self.room_order.get(index).map(String::as_str)
    }

    /// Room at grid coordinate `(x, y)`.
    #[must_use]
    pub fn cell_at(&self, x: usize, y: usize) -> Option<&str> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.room_at(y * self.width + x)
    }

    /// Cell index of `room`.
    #[must_use]
    pub fn index_of(&self, room: &str) -> Option<usize> {
        self.index_by_room.get(room).copied()
    }

    /// Grid coordinate of `room`.
    #[must_use]
    pub fn coord_of(&self, room: &str) -> Option<(usize, usize)> {
        self.index_of(room).map(|i| self.coord(i))
    }

    /// Grid coordinate of cell `index`.
    #[must_use]
    pub fn coord(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    /// Neighbor cell of `index` in `dir`, ignoring walls.
    #[must_use]
    pub fn neighbor(&self, index: usize, dir: Direction) -> Option<usize> {
        neighbor_index(self.width, self.height, index, dir)
    }

    /// Directions a traveller may take from `index`: base passages plus
    /// link doors.
    #[must_use]
    pub fn passable(&self, index: usize) -> Passages {
        match (self.base_passages.get(index), self.link_open.get(index)) {
            (Some(base), Some(link)) => base.union(*link),
            _ => Passages::NONE,
        }
    }

    /// Cell reached from `index` by walking `dir`, if a passage allows it.
    #[must_use]
    pub fn step(&self, index: usize, dir: Direction) -> Option<usize> {
        if self.passable(index).contains(dir) {
            self.neighbor(index, dir)
        } else {
            None
        }
    }

    /// Snapshot for the durable store. Link doors are derived and not stored.
    #[must_use]
    pub fn to_persisted(&self) -> PersistedLayout {
        PersistedLayout {
            version: LAYOUT_VERSION,
            signature: self.signature.clone(),
            width: self.width,
            cell_count: self.cell_count(),
            note_order: self.room_order.clone(),
            base_passages: self.base_passages.iter().map(|p| p.bits()).collect(),
        }
    }
}

/// Produces layouts from document graphs.
#[derive(Clone, Debug, Default)]
pub struct LayoutGenerator {
    config: LayoutConfig,
}

impl LayoutGenerator {
    /// Creates a generator.
    #[must_use]
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Signature the current id set would get.
    #[must_use]
    pub fn signature_for(&self, graph: &DocumentGraph) -> Option<String> {
        if graph.is_empty() {
            return None;
        }
        let ids = graph.sorted_ids();
        let (width, height) = grid_dimensions(ids.len(), self.config.sparsity, self.config.max_cells);
        Some(layout_signature(width * height, &ids))
    }

    /// Returns the persisted layout if it still fits the graph, otherwise a
    /// fresh (or reconciled) one. Link doors are applied either way.
    ///
    /// An empty graph has no maze and yields `None`.
    #[must_use]
    pub fn build_or_reuse(
        &self,
        graph: &DocumentGraph,
        persisted: Option<&PersistedLayout>,
    ) -> Option<MazeLayout> {
        if graph.is_empty() {
            tracing::debug!("Empty document graph, no maze");
            return None;
        }
        let signature = self.signature_for(graph)?;

        let mut previous = None;
        if let Some(record) = persisted {
            match MazeLayout::try_from(record) {
                Ok(layout) if layout.signature == signature && covers_exactly(&layout, graph) => {
                    tracing::info!("Reusing persisted layout {}", signature);
                    let mut layout = layout;
                    layout.update_link_openings(graph);
                    return Some(layout);
                }
                Ok(layout) => {
                    tracing::info!(
                        "Persisted layout {} is stale (now {}), reconciling placements",
                        layout.signature,
                        signature
                    );
                    previous = Some(layout);
                }
                Err(e) => {
                    tracing::warn!("Rejected persisted layout: {}", e);
                }
            }
        }

        let mut layout = self.generate_with(graph, signature, previous.as_ref());
        layout.update_link_openings(graph);
        Some(layout)
    }

    /// Generates a fresh layout, ignoring any persisted one.
    #[must_use]
    pub fn generate(&self, graph: &DocumentGraph) -> Option<MazeLayout> {
        let signature = self.signature_for(graph)?;
        Some(self.generate_with(graph, signature, None))
    }

    fn generate_with(
        &self,
        graph: &DocumentGraph,
        signature: String,
        previous: Option<&MazeLayout>,
    ) -> MazeLayout {
        let ids = graph.sorted_ids();
        let (width, height) = grid_dimensions(ids.len(), self.config.sparsity, self.config.max_cells);
        let cell_count = width * height;

        let seed = LayoutSeed::from_signature(&signature);
        let mut rng = seed.rng();
        let mut passages = carve_perfect_maze(width, height, &mut rng);
        let extra = braid_count(cell_count, self.config.braid_ratio);
        let opened = braid(&mut passages, width, height, extra, &mut rng);

        tracing::debug!(
            "Generated {}x{} maze for {} documents (seed {:08x}, {} braids)",
            width,
            height,
            ids.len(),
            seed.value(),
            opened
        );

        let room_order = assign_rooms(&ids, cell_count, previous);
        let mut index_by_room = HashMap::with_capacity(cell_count);
        for (index, id) in room_order.iter().enumerate() {
            index_by_room.insert(id.clone(), index);
        }

        let layout = MazeLayout {
            width,
            height,
            link_open: vec![Passages::NONE; cell_count],
            room_order,
            base_passages: passages,
            index_by_room,
            signature,
        };
        debug_assert!(layout.validate().is_ok(), "generator produced an invalid layout");
        layout
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn braid_count(cell_count: usize, ratio: f64) -> usize {
    (cell_count as f64 * ratio.clamp(0.0, 1.0)).round() as usize
}

/// True if the layout holds exactly the graph's documents.
fn covers_exactly(layout: &MazeLayout, graph: &DocumentGraph) -> bool {
    layout.document_count() == graph.len()
        && graph.nodes().all(|node| layout.index_by_room.contains_key(&node.id))
}

/// Places `sorted_ids` into `cell_count` slots.
///
/// Without a previous layout documents fill the first slots in order and void
/// markers pad the rest. With one, surviving documents keep their old slot
/// when it is inside the new grid.
fn assign_rooms(sorted_ids: &[String], cell_count: usize, previous: Option<&MazeLayout>) -> Vec<RoomId> {
    let mut slots: Vec<Option<&String>> = vec![None; cell_count];
    let mut placed: HashSet<&str> = HashSet::new();

    if let Some(prev) = previous {
        for id in sorted_ids {
            if let Some(index) = prev.index_of(id) {
                if index < cell_count && slots[index].is_none() {
                    slots[index] = Some(id);
                    placed.insert(id.as_str());
                }
            }
        }
    }

    let mut remaining = sorted_ids.iter().filter(|id| !placed.contains(id.as_str()));
    let mut voids = 0;
    slots
        .into_iter()
        .map(|slot| match slot.or_else(|| remaining.next()) {
            Some(id) => id.clone(),
            None => {
                let marker = void_marker(voids);
                voids += 1;
                marker
            }
        })
        .collect()
}
