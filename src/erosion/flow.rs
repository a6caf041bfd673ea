//! Steepest-descent flow field over the neighbor graph.
//!
//! Recomputed in full before every rainfall pass and then frozen: all
//! droplets of a pass route on the same snapshot.

use rayon::prelude::*;

use crate::heightfield::HeightField;
use crate::neighbors::NeighborGraph;

/// Where water leaves a cell and how far it falls getting there.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlowCell {
    /// Lowest neighbor, or the cell itself when no neighbor is lower
    pub target: usize,
    /// `own height - target height`, never negative
    pub drop: f32,
}

impl FlowCell {
    pub fn is_sink(&self) -> bool {
        self.drop == 0.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FlowField {
    cells: Vec<FlowCell>,
}

impl FlowField {
    /// Scan the 8 neighbors of every cell for the lowest one.
    ///
    /// Only a strictly lower neighbor replaces the current best, so ties keep
    /// the earliest slot and a local minimum points at itself. Cells are
    /// independent, so the scan runs data-parallel; the result is identical to
    /// a sequential sweep.
    pub fn compute(heightfield: &HeightField, graph: &NeighborGraph) -> Self {
        debug_assert_eq!(heightfield.len(), graph.len(), "graph and heightfield disagree on size");

        let cells: Vec<FlowCell> = (0..heightfield.len())
            .into_par_iter()
            .map(|idx| {
                let own = heightfield.height(idx);
                let mut best = idx;
                let mut best_height = own;
                for &n in graph.neighbors(idx) {
                    let h = heightfield.height(n);
                    if h < best_height {
                        best = n;
                        best_height = h;
                    }
                }
                FlowCell { target: best, drop: (own - best_height).max(0.0) }
            })
            .collect();

        log::debug!("computed flow field over {} cells", cells.len());
        Self { cells }
    }

    #[inline]
    pub fn cell(&self, index: usize) -> FlowCell {
        self.cells[index]
    }

    pub fn cells(&self) -> &[FlowCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn max_drop(&self) -> f32 {
        self.cells.iter().map(|c| c.drop).fold(0.0, f32::max)
    }

    pub fn sink_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_sink()).count()
    }
}
