//! Uniform-grid spatial index over circle bodies.
//!
//! Bodies live in an arena of slots; each slot is linked into every grid
//! cell its bounding box overlaps. Queries are broad-phase only: callers
//! follow up with the precise tests in [`super::collisions`].

use std::collections::HashMap;

use broadside_logic::xy::XY;

use super::collisions::ray_circle;

/// Grid cell edge length. Sized so a typical ship touches one cell and the
/// largest asteroids touch at most four.
const CELL_SIZE: f64 = 500.0;

/// Handle to a body in the index. Valid until the body is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(usize);

#[derive(Debug, Clone)]
struct BodySlot {
    center: XY,
    radius: f64,
    min_cell: (i64, i64),
    max_cell: (i64, i64),
}

#[derive(Debug, Default)]
pub struct SpatialIndex {
    slots: Vec<Option<BodySlot>>,
    free: Vec<usize>,
    cells: HashMap<(i64, i64), Vec<usize>>,
}

fn cell_of(value: f64) -> i64 {
    (value / CELL_SIZE).floor() as i64
}

fn cell_range(center: XY, radius: f64) -> ((i64, i64), (i64, i64)) {
    (
        (cell_of(center.x - radius), cell_of(center.y - radius)),
        (cell_of(center.x + radius), cell_of(center.y + radius)),
    )
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn insert(&mut self, center: XY, radius: f64) -> BodyId {
        let (min_cell, max_cell) = cell_range(center, radius);
        let slot = BodySlot {
            center,
            radius,
            min_cell,
            max_cell,
        };
        let index = match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(slot);
                index
            }
            None => {
                self.slots.push(Some(slot));
                self.slots.len() - 1
            }
        };
        self.link(index, min_cell, max_cell);
        BodyId(index)
    }

    pub fn remove(&mut self, id: BodyId) {
        if let Some(slot) = self.slots[id.0].take() {
            self.unlink(id.0, slot.min_cell, slot.max_cell);
            self.free.push(id.0);
        }
    }

    /// Current center and radius of a body.
    pub fn body(&self, id: BodyId) -> Option<(XY, f64)> {
        self.slots[id.0]
            .as_ref()
            .map(|slot| (slot.center, slot.radius))
    }

    /// Moves and resizes a body, relinking it only when its cell span
    /// actually changed.
    pub fn update_body(&mut self, id: BodyId, center: XY, radius: f64) {
        let Some(slot) = self.slots[id.0].as_mut() else {
            return;
        };
        let (min_cell, max_cell) = cell_range(center, radius);
        let moved_cells = (min_cell, max_cell) != (slot.min_cell, slot.max_cell);
        let old_range = (slot.min_cell, slot.max_cell);
        slot.center = center;
        slot.radius = radius;
        slot.min_cell = min_cell;
        slot.max_cell = max_cell;
        if moved_cells {
            self.unlink(id.0, old_range.0, old_range.1);
            self.link(id.0, min_cell, max_cell);
        }
    }

    /// Bodies whose bounding boxes share a grid cell with `id`, sorted and
    /// deduplicated, excluding `id` itself.
    pub fn potentials(&self, id: BodyId) -> Vec<BodyId> {
        let Some(slot) = self.slots[id.0].as_ref() else {
            return Vec::new();
        };
        let mut found = self.collect_cells(slot.min_cell, slot.max_cell);
        found.retain(|&index| index != id.0);
        found.into_iter().map(BodyId).collect()
    }

    /// Bodies whose bounding boxes overlap the cells of the given circle.
    pub fn query_circle(&self, center: XY, radius: f64) -> Vec<BodyId> {
        let (min_cell, max_cell) = cell_range(center, radius);
        self.collect_cells(min_cell, max_cell)
            .into_iter()
            .map(BodyId)
            .collect()
    }

    /// Closest body hit by the segment `origin..dest`, as a fraction along
    /// the segment. Bodies for which `ignore` returns true are skipped.
    pub fn raycast(
        &self,
        origin: XY,
        dest: XY,
        ignore: impl Fn(BodyId) -> bool,
    ) -> Option<(BodyId, f64)> {
        let min = XY::new(origin.x.min(dest.x), origin.y.min(dest.y));
        let max = XY::new(origin.x.max(dest.x), origin.y.max(dest.y));
        let min_cell = (cell_of(min.x), cell_of(min.y));
        let max_cell = (cell_of(max.x), cell_of(max.y));
        let mut best: Option<(BodyId, f64)> = None;
        for index in self.collect_cells(min_cell, max_cell) {
            let id = BodyId(index);
            if ignore(id) {
                continue;
            }
            let Some(slot) = self.slots[index].as_ref() else {
                continue;
            };
            if let Some(t) = ray_circle(origin, dest, slot.center, slot.radius) {
                if best.map_or(true, |(_, best_t)| t < best_t) {
                    best = Some((id, t));
                }
            }
        }
        best
    }

    fn collect_cells(&self, min_cell: (i64, i64), max_cell: (i64, i64)) -> Vec<usize> {
        let mut found = Vec::new();
        for cx in min_cell.0..=max_cell.0 {
            for cy in min_cell.1..=max_cell.1 {
                if let Some(cell) = self.cells.get(&(cx, cy)) {
                    found.extend_from_slice(cell);
                }
            }
        }
        found.sort_unstable();
        found.dedup();
        found
    }

    fn link(&mut self, index: usize, min_cell: (i64, i64), max_cell: (i64, i64)) {
        for cx in min_cell.0..=max_cell.0 {
            for cy in min_cell.1..=max_cell.1 {
                self.cells.entry((cx, cy)).or_default().push(index);
            }
        }
    }

    fn unlink(&mut self, index: usize, min_cell: (i64, i64), max_cell: (i64, i64)) {
        for cx in min_cell.0..=max_cell.0 {
            for cy in min_cell.1..=max_cell.1 {
                if let Some(cell) = self.cells.get_mut(&(cx, cy)) {
                    cell.retain(|&other| other != index);
                    if cell.is_empty() {
                        self.cells.remove(&(cx, cy));
                    }
                }
            }
        }
    }
}
