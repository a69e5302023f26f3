//! Uniform spatial grid over the arena
//!
//! Broad-phase only: queries return every entity in the cells touched by the
//! query circle's bounding box, so callers must still run an exact overlap
//! test on the candidates.

use glam::Vec2;

use super::Circle;
use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH, GRID_CELL_SIZE};

/// Fixed-extent bucket grid storing indices into an entity slice
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    pub cell_size: f32,
    cols: usize,
    rows: usize,
    cells: Vec<Vec<usize>>,
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self::new(ARENA_WIDTH, ARENA_HEIGHT, GRID_CELL_SIZE)
    }
}

impl SpatialGrid {
    pub fn new(width: f32, height: f32, cell_size: f32) -> Self {
        let cols = ((width / cell_size).ceil() as usize).max(1);
        let rows = ((height / cell_size).ceil() as usize).max(1);
        Self {
            cell_size,
            cols,
            rows,
            cells: vec![Vec::new(); cols * rows],
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Empty every bucket, keeping allocations
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    /// Column for an x coordinate, clamped into the grid
    fn col(&self, x: f32) -> usize {
        let c = (x / self.cell_size).floor();
        if c <= 0.0 { 0 } else { (c as usize).min(self.cols - 1) }
    }

    fn row(&self, y: f32) -> usize {
        let r = (y / self.cell_size).floor();
        if r <= 0.0 { 0 } else { (r as usize).min(self.rows - 1) }
    }

    /// Bucket `index` by the entity's center
    pub fn insert(&mut self, index: usize, entity: &impl Circle) {
        let pos = entity.pos();
        let cell = self.row(pos.y) * self.cols + self.col(pos.x);
        self.cells[cell].push(index);
    }

    /// Rebuild from the alive members of `entities`
    pub fn rebuild<T: Circle>(&mut self, entities: &[T]) {
        self.clear();
        for (i, e) in entities.iter().enumerate() {
            if e.is_alive() {
                self.insert(i, e);
            }
        }
    }

    /// Candidates whose cell intersects the circle's bounding box.
    /// `out` is cleared first.
    pub fn query_circle_into(&self, center: Vec2, radius: f32, out: &mut Vec<usize>) {
        out.clear();
        let (c0, c1) = (self.col(center.x - radius), self.col(center.x + radius));
        let (r0, r1) = (self.row(center.y - radius), self.row(center.y + radius));
        for row in r0..=r1 {
            for col in c0..=c1 {
                out.extend_from_slice(&self.cells[row * self.cols + col]);
            }
        }
    }

    pub fn query_circle(&self, center: Vec2, radius: f32) -> Vec<usize> {
        let mut out = Vec::new();
        self.query_circle_into(center, radius, &mut out);
        out
    }
}
