// SPDX-License-Identifier: Apache-2.0
//! Uniform spatial grid for broad-phase candidate lookup.

use rustc_hash::FxHashMap;
use torq_math::{Fx, Vec2};

use crate::body::BodyId;

/// Bounds and resolution of the broad-phase grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridConfig {
    /// World-space minimum corner covered by the grid.
    pub min: Vec2,
    /// World-space maximum corner covered by the grid.
    pub max: Vec2,
    /// Edge length of one square cell.
    pub cell_size: Fx,
}

/// Uniform grid mapping body positions to cells.
///
/// Bodies outside the configured bounds clamp to the border cells, so
/// nothing is ever lost. Cell contents keep insertion order; the hash map is
/// used for membership lookup only, never iterated, so iteration order of
/// the map cannot leak into results.
///
/// Bodies are bucketed by center position, so the query neighborhood must
/// reach far enough that two bodies whose AABBs overlap always land inside
/// it. Each insertion carries the body's bounding extent (its largest
/// possible AABB span) and the grid widens its scan radius to
/// `ceil(max_extent / cell_size)` cells, never below one. The radius only
/// grows; removals do not shrink it.
#[derive(Debug)]
pub struct SpatialGrid {
    min: Vec2,
    cell_size: Fx,
    cols: usize,
    rows: usize,
    reach: i64,
    cells: Vec<Vec<BodyId>>,
    locations: FxHashMap<BodyId, usize>,
}

impl SpatialGrid {
    /// Builds an empty grid covering the configured bounds.
    ///
    /// A non-positive cell size falls back to one world unit.
    #[must_use]
    pub fn new(config: GridConfig) -> Self {
        let cell_size = if config.cell_size <= Fx::ZERO {
            Fx::ONE
        } else {
            config.cell_size
        };
        let span_cells = |lo: Fx, hi: Fx| -> usize {
            let span = (hi - lo).max(Fx::ZERO) / cell_size;
            usize::try_from(span.floor_to_i64().max(0)).unwrap_or(0) + 1
        };
        let cols = span_cells(config.min.x, config.max.x);
        let rows = span_cells(config.min.y, config.max.y);
        Self {
            min: config.min,
            cell_size,
            cols,
            rows,
            reach: 1,
            cells: vec![Vec::new(); cols * rows],
            locations: FxHashMap::default(),
        }
    }

    /// Widens the scan radius so a body spanning `extent` world units can
    /// still be found from any cell its AABB overlaps.
    fn grow_reach(&mut self, extent: Fx) {
        let q = extent / self.cell_size;
        let floor = q.floor_to_i64();
        let cells = floor + i64::from(Fx::from_int(floor) != q);
        self.reach = self.reach.max(cells);
    }

    fn axis_cell(&self, value: Fx, origin: Fx, count: usize) -> usize {
        let raw = ((value - origin) / self.cell_size).floor_to_i64();
        let clamped = raw.clamp(0, count as i64 - 1);
        usize::try_from(clamped).unwrap_or(0)
    }

    fn cell_index(&self, position: Vec2) -> usize {
        let col = self.axis_cell(position.x, self.min.x, self.cols);
        let row = self.axis_cell(position.y, self.min.y, self.rows);
        row * self.cols + col
    }

    /// Registers a body at `position`. `extent` is the body's bounding
    /// extent (largest AABB span it can present) and widens the query
    /// neighborhood when it exceeds the cell size.
    pub fn insert(&mut self, id: BodyId, position: Vec2, extent: Fx) {
        self.grow_reach(extent);
        let idx = self.cell_index(position);
        self.cells[idx].push(id);
        self.locations.insert(id, idx);
    }

    /// Removes a body; silently ignores unknown ids.
    pub fn remove(&mut self, id: BodyId) {
        if let Some(idx) = self.locations.remove(&id) {
            self.cells[idx].retain(|&other| other != id);
        }
    }

    /// Moves a body to the cell containing `position`, if it changed.
    pub fn update(&mut self, id: BodyId, position: Vec2) {
        let new_idx = self.cell_index(position);
        match self.locations.get(&id).copied() {
            Some(old_idx) if old_idx == new_idx => {}
            Some(old_idx) => {
                self.cells[old_idx].retain(|&other| other != id);
                self.cells[new_idx].push(id);
                self.locations.insert(id, new_idx);
            }
            None => {
                self.cells[new_idx].push(id);
                self.locations.insert(id, new_idx);
            }
        }
    }

    /// Appends to `out` every body registered in the cell neighborhood
    /// around `position` (at least 3x3, wider when large bodies were
    /// inserted), in cell-scan then insertion order. Includes the querying
    /// body itself if it is registered there.
    pub fn potential_colliders(&self, position: Vec2, out: &mut Vec<BodyId>) {
        let col = self.axis_cell(position.x, self.min.x, self.cols) as i64;
        let row = self.axis_cell(position.y, self.min.y, self.rows) as i64;
        for dr in -self.reach..=self.reach {
            let r = row + dr;
            if r < 0 || r >= self.rows as i64 {
                continue;
            }
            for dc in -self.reach..=self.reach {
                let c = col + dc;
                if c < 0 || c >= self.cols as i64 {
                    continue;
                }
                let idx = (r as usize) * self.cols + c as usize;
                out.extend_from_slice(&self.cells[idx]);
            }
        }
    }
}
