//! Mutable elevation grid: one `(x, height, z)` vertex per grid cell.

use serde::{Deserialize, Serialize};

use crate::grid::GridDims;

/// A single terrain vertex. `x` and `z` are fixed at creation; only `height`
/// changes under erosion and deposition.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Vertex {
    pub x: f32,
    pub height: f32,
    pub z: f32,
}

/// Row-major vertex grid indexed by [`GridDims::index`].
#[derive(Clone, Debug, PartialEq)]
pub struct HeightField {
    dims: GridDims,
    vertices: Vec<Vertex>,
}

impl HeightField {
    /// Create a heightfield by evaluating `sample(x, z)` at every vertex.
    pub fn from_fn<F>(dims: GridDims, mut sample: F) -> Self
    where
        F: FnMut(usize, usize) -> f32,
    {
        let vertices = dims
            .iter()
            .map(|(_, x, z)| Vertex { x: x as f32, height: sample(x, z), z: z as f32 })
            .collect();
        Self { dims, vertices }
    }

    /// Create a heightfield with every vertex at `height`.
    pub fn flat(dims: GridDims, height: f32) -> Self {
        Self::from_fn(dims, |_, _| height)
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[inline]
    pub fn height(&self, index: usize) -> f32 {
        self.vertices[index].height
    }

    #[inline]
    pub fn height_at(&self, x: usize, z: usize) -> f32 {
        self.height(self.dims.index(x, z))
    }

    #[inline]
    pub fn set_height(&mut self, index: usize, height: f32) {
        self.vertices[index].height = height;
    }

    #[inline]
    pub fn add_height(&mut self, index: usize, delta: f32) {
        self.vertices[index].height += delta;
    }

    pub fn vertex(&self, index: usize) -> &Vertex {
        &self.vertices[index]
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Heights in storage order.
    pub fn heights(&self) -> impl Iterator<Item = f32> + '_ {
        self.vertices.iter().map(|v| v.height)
    }

    pub fn min_height(&self) -> f32 {
        self.heights().fold(f32::INFINITY, f32::min)
    }

    pub fn max_height(&self) -> f32 {
        self.heights().fold(f32::NEG_INFINITY, f32::max)
    }

    /// Sum of all heights, accumulated in f64.
    pub fn total_height(&self) -> f64 {
        self.heights().map(|h| h as f64).sum()
    }
}
