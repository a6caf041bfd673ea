//! Erosion simulation module
//!
//! Two pieces work together on a shared heightfield:
//! - **Flow field**: steepest-descent target and height drop for every cell
//! - **Hydraulic erosion**: droplets routed by the flow field that pick up
//!   and drop sediment along their path

pub mod flow;
pub mod hydraulic;
pub mod params;

pub use flow::{FlowCell, FlowField};
pub use hydraulic::{simulate, Droplet};
pub use params::{ErosionParams, ErosionPreset};

use rand::Rng;

use crate::heightfield::HeightField;
use crate::neighbors::NeighborGraph;

/// Statistics from erosion simulation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErosionStats {
    /// Total material eroded (in height units)
    pub total_eroded: f64,
    /// Total material deposited
    pub total_deposited: f64,
    /// Total number of droplet steps
    pub steps_taken: u64,
    /// Number of droplets processed
    pub iterations: usize,
    /// Largest single erosion
    pub max_erosion: f32,
    /// Largest single deposit
    pub max_deposition: f32,
    /// Droplets stopped by the step cap
    pub capped_droplets: usize,
    /// Longest droplet path, in steps
    pub longest_path: usize,
}

impl ErosionStats {
    pub(crate) fn record_erosion(&mut self, amount: f32) {
        self.total_eroded += amount as f64;
        self.max_erosion = self.max_erosion.max(amount);
    }

    pub(crate) fn record_deposit(&mut self, amount: f32) {
        self.total_deposited += amount as f64;
        self.max_deposition = self.max_deposition.max(amount);
    }

    /// Fold another pass into these totals.
    pub fn merge(&mut self, other: &ErosionStats) {
        self.total_eroded += other.total_eroded;
        self.total_deposited += other.total_deposited;
        self.steps_taken += other.steps_taken;
        self.iterations += other.iterations;
        self.max_erosion = self.max_erosion.max(other.max_erosion);
        self.max_deposition = self.max_deposition.max(other.max_deposition);
        self.capped_droplets += other.capped_droplets;
        self.longest_path = self.longest_path.max(other.longest_path);
    }

    /// Mean steps per droplet.
    pub fn mean_path(&self) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            self.steps_taken as f64 / self.iterations as f64
        }
    }
}

/// Run one complete rainfall pass: freeze a flow field from the current
/// heights, then simulate every droplet against it.
///
/// Returns the flow field the pass routed on together with its statistics.
pub fn erode_pass<R: Rng + ?Sized>(
    heightfield: &mut HeightField,
    graph: &NeighborGraph,
    params: &ErosionParams,
    rng: &mut R,
) -> (FlowField, ErosionStats) {
    let flow = FlowField::compute(heightfield, graph);
    let stats = simulate(heightfield, &flow, graph, params, rng);
    (flow, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{GridDims, Topology};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_merge_accumulates() {
        let mut a = ErosionStats {
            total_eroded: 1.0,
            steps_taken: 10,
            iterations: 5,
            max_erosion: 0.4,
            longest_path: 3,
            ..Default::default()
        };
        let b = ErosionStats {
            total_eroded: 2.0,
            total_deposited: 0.5,
            steps_taken: 20,
            iterations: 5,
            max_erosion: 0.2,
            capped_droplets: 1,
            longest_path: 7,
            ..Default::default()
        };
        a.merge(&b);
        assert_eq!(a.total_eroded, 3.0);
        assert_eq!(a.total_deposited, 0.5);
        assert_eq!(a.iterations, 10);
        assert_eq!(a.max_erosion, 0.4);
        assert_eq!(a.capped_droplets, 1);
        assert_eq!(a.longest_path, 7);
        assert_eq!(a.mean_path(), 3.0);
    }

    #[test]
    fn test_pass_routes_on_pre_pass_heights() {
        let dims = GridDims::new(12, 12).unwrap();
        let graph = NeighborGraph::build(dims, Topology::Legacy);
        let mut hf = HeightField::from_fn(dims, |x, z| ((x * 7 + z * 3) % 11) as f32);
        let before = FlowField::compute(&hf, &graph);

        let params = ErosionParams { iterations: 50, ..Default::default() };
        let (flow, stats) = erode_pass(&mut hf, &graph, &params, &mut ChaCha8Rng::seed_from_u64(8));

        assert_eq!(flow, before);
        assert_eq!(stats.iterations, 50);
    }
}
