//! Toroidal 8-neighbor adjacency, built once per grid and never mutated.

use crate::grid::{wrap, GridDims, Topology};

/// Offsets `(dx, dz)` in neighbor-slot order, starting at the `(-1, -1)`
/// diagonal and sweeping around the cell.
pub const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
];

/// Adjacency table for every vertex plus the explicit inverse `index -> (x, z)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NeighborGraph {
    dims: GridDims,
    topology: Topology,
    neighbors: Vec<[usize; 8]>,
    coords: Vec<(usize, usize)>,
}

impl NeighborGraph {
    /// Build the adjacency table.
    ///
    /// Only the offset axis is wrapped; the orthogonal neighbors keep the
    /// cell's own coordinate on the other axis. With `Topology::Legacy` the
    /// period is `width x depth`: the `+1` neighbor of column `width - 1` is
    /// column 0 and the `+1` neighbor of column `width` is column 1.
    pub fn build(dims: GridDims, topology: Topology) -> Self {
        let (mod_x, mod_z) = topology.moduli(dims);
        let n = dims.cell_count();
        let mut neighbors = vec![[0usize; 8]; n];
        let mut coords = vec![(0usize, 0usize); n];

        for z in 0..=dims.depth() {
            for x in 0..=dims.width() {
                let idx = dims.index(x, z);
                let mut slots = [0usize; 8];
                for (slot, &(dx, dz)) in NEIGHBOR_OFFSETS.iter().enumerate() {
                    let nx = if dx == 0 { x } else { wrap(x as isize + dx, mod_x) };
                    let nz = if dz == 0 { z } else { wrap(z as isize + dz, mod_z) };
                    slots[slot] = dims.index(nx, nz);
                }
                neighbors[idx] = slots;
                coords[idx] = (x, z);
            }
        }

        log::debug!(
            "built {} neighbor graph for {}x{} grid ({} vertices)",
            topology,
            dims.width(),
            dims.depth(),
            n
        );

        Self { dims, topology, neighbors, coords }
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    #[inline]
    pub fn neighbors(&self, index: usize) -> &[usize; 8] {
        &self.neighbors[index]
    }

    #[inline]
    pub fn neighbors_at(&self, x: usize, z: usize) -> &[usize; 8] {
        &self.neighbors[self.dims.index(x, z)]
    }

    /// Inverse lookup from the stored table.
    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        self.coords[index]
    }
}
