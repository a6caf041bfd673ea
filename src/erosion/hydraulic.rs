//! Hydraulic erosion simulation using particle-based water droplets.
//!
//! Each droplet lands on a random cell with a random mass and follows the
//! frozen flow field downhill. Every step it loses mass to evaporation (fast
//! on gentle slopes, slow on steep ones). While its sediment load is below its
//! mass it erodes the cell it stands on; once over-saturated it drops the
//! excess on the surrounding ring of neighbors and on the cell itself.
//!
//! Droplets run strictly one after another. Each one sees the height changes
//! of the droplets before it, but routes and sizes its erosion with the slope
//! data captured when the pass started.

use rand::Rng;

use crate::erosion::flow::FlowField;
use crate::erosion::params::ErosionParams;
use crate::erosion::ErosionStats;
use crate::heightfield::HeightField;
use crate::neighbors::NeighborGraph;

/// Share of the excess sediment dropped on each of the 8 neighbors
const NEIGHBOR_SHARE: f32 = 1.0 / 16.0;
/// Share of the excess sediment dropped on the droplet's own cell
const CENTRE_SHARE: f32 = 0.5;
/// Multiplicative jitter applied to every deposit
const JITTER_MIN: f32 = 0.75;
const JITTER_MAX: f32 = 1.25;

/// A water droplet for hydraulic erosion simulation
#[derive(Clone, Debug, PartialEq)]
pub struct Droplet {
    /// Cell the droplet currently sits on
    pub index: usize,
    /// Carried sediment; may dip slightly below zero after a jittered deposit
    pub sediment: f32,
    /// Remaining water mass
    pub mass: f32,
}

impl Droplet {
    pub fn new(index: usize, mass: f32) -> Self {
        Self { index, sediment: 0.0, mass }
    }

    /// Spawn on a uniformly random cell with mass in `[min_mass, flow_scale]`.
    /// Panics if `min_mass > flow_scale`; validate the params first.
    pub fn spawn<R: Rng + ?Sized>(cell_count: usize, params: &ErosionParams, rng: &mut R) -> Self {
        let index = rng.gen_range(0..cell_count);
        let mass = rng.gen_range(params.min_mass..=params.flow_scale);
        Self::new(index, mass)
    }

    pub fn is_alive(&self) -> bool {
        self.mass > 0.0
    }

    /// Advance one step: evaporate, erode or deposit, then move to the
    /// flow target of the current cell.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        heightfield: &mut HeightField,
        flow: &FlowField,
        graph: &NeighborGraph,
        rng: &mut R,
        stats: &mut ErosionStats,
    ) {
        let current = flow.cell(self.index);

        self.mass = evaporate(self.mass, current.drop);

        if self.sediment > self.mass {
            // Over-saturated: drop the excess around and onto this cell
            let delta = self.sediment - self.mass;
            for &neighbor in graph.neighbors(self.index) {
                let amount = delta * NEIGHBOR_SHARE * rng.gen_range(JITTER_MIN..=JITTER_MAX);
                heightfield.add_height(neighbor, amount);
                self.sediment -= amount;
                stats.record_deposit(amount);
            }
            let deposit = delta * rng.gen_range(JITTER_MIN..=JITTER_MAX) * CENTRE_SHARE;
            heightfield.add_height(self.index, deposit);
            self.sediment -= deposit;
            stats.record_deposit(deposit);
        } else {
            // Spare capacity: pick up material from this cell
            let delta = self.mass - self.sediment;
            let erosion = erode_amount(delta, current.drop, rng);
            heightfield.add_height(self.index, -erosion);
            self.sediment += erosion;
            stats.record_erosion(erosion);
        }

        self.index = current.target;
        stats.steps_taken += 1;
    }
}

/// Mass left after one step of evaporation.
///
/// Evaporation is `mass / drop²` and the result is clamped at zero. A zero
/// (or vanishing) drop evaporates everything instead of dividing by zero.
#[inline]
pub fn evaporate(mass: f32, drop: f32) -> f32 {
    let slope_sq = drop * drop;
    if slope_sq <= 0.0 || !slope_sq.is_finite() {
        return 0.0;
    }
    let evaporation = mass / slope_sq;
    if evaporation.is_finite() && evaporation <= mass {
        mass - evaporation
    } else {
        0.0
    }
}

/// Amount eroded given spare carrying capacity `delta` and local drop `max`.
///
/// A random fraction `r` of the capacity is taken; if that would exceed the
/// drop, `max * r` is taken instead.
#[inline]
pub fn erode_amount<R: Rng + ?Sized>(delta: f32, max: f32, rng: &mut R) -> f32 {
    let r: f32 = rng.gen_range(0.0..=1.0);
    let capacity = delta * r;
    if capacity < max {
        capacity
    } else {
        max * r
    }
}

/// Run one droplet to completion. Returns the number of steps taken and
/// whether the step cap cut it short.
pub fn run_droplet<R: Rng + ?Sized>(
    droplet: &mut Droplet,
    heightfield: &mut HeightField,
    flow: &FlowField,
    graph: &NeighborGraph,
    params: &ErosionParams,
    rng: &mut R,
    stats: &mut ErosionStats,
) -> (usize, bool) {
    let mut steps = 0;
    while droplet.is_alive() {
        if steps >= params.max_steps {
            droplet.mass = 0.0;
            return (steps, true);
        }
        droplet.step(heightfield, flow, graph, rng, stats);
        steps += 1;
    }
    (steps, false)
}

/// Run one rainfall pass of `params.iterations` droplets.
///
/// Algorithm:
/// 1. Spawn a droplet on a random cell with random mass and no sediment
/// 2. While it still has mass:
///    a. Look up the flow cell under it
///    b. Evaporate `mass / drop²` (everything when the drop is zero)
///    c. If carrying more sediment than mass: deposit the excess on the
///       8 neighbors (1/16 each) and the cell itself (1/2), each jittered
///    d. Otherwise: erode a random share of the spare capacity, capped by
///       the drop
///    e. Move to the flow target
///
/// `params` must pass [`ErosionParams::validate`]; an inverted mass range
/// cannot be sampled.
pub fn simulate<R: Rng + ?Sized>(
    heightfield: &mut HeightField,
    flow: &FlowField,
    graph: &NeighborGraph,
    params: &ErosionParams,
    rng: &mut R,
) -> ErosionStats {
    debug_assert!(params.validate().is_ok(), "invalid erosion params: {:?}", params);
    debug_assert_eq!(heightfield.len(), flow.len());
    debug_assert_eq!(heightfield.len(), graph.len());

    let mut stats = ErosionStats { iterations: params.iterations, ..Default::default() };
    let cell_count = heightfield.len();

    for _ in 0..params.iterations {
        let mut droplet = Droplet::spawn(cell_count, params, rng);
        let (steps, capped) =
            run_droplet(&mut droplet, heightfield, flow, graph, params, rng, &mut stats);
        stats.longest_path = stats.longest_path.max(steps);
        if capped {
            stats.capped_droplets += 1;
        }
    }

    if stats.capped_droplets > 0 {
        log::warn!(
            "{} of {} droplets hit the {}-step cap",
            stats.capped_droplets,
            params.iterations,
            params.max_steps
        );
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{GridDims, Topology};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn ramp(w: usize, d: usize, slope: f32) -> (HeightField, NeighborGraph) {
        let dims = GridDims::new(w, d).unwrap();
        let graph = NeighborGraph::build(dims, Topology::Legacy);
        let hf = HeightField::from_fn(dims, |x, _| (w - x) as f32 * slope);
        (hf, graph)
    }

    #[test]
    fn test_evaporation_guard_on_zero_drop() {
        assert_eq!(evaporate(5.0, 0.0), 0.0);
        assert_eq!(evaporate(5.0, 1e-30), 0.0);
        assert_eq!(evaporate(5.0, 0.5), 0.0);
        assert_eq!(evaporate(8.0, 2.0), 6.0);
    }

    #[test]
    fn test_erode_capped_by_drop() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..500 {
            let e = erode_amount(100.0, 0.5, &mut rng);
            assert!((0.0..=0.5).contains(&e), "erosion {} exceeds drop", e);
        }
        for _ in 0..500 {
            let e = erode_amount(0.2, 10.0, &mut rng);
            assert!((0.0..=0.2).contains(&e));
        }
    }

    #[test]
    fn test_flat_droplet_terminates_in_one_step() {
        let dims = GridDims::new(4, 4).unwrap();
        let graph = NeighborGraph::build(dims, Topology::Legacy);
        let mut hf = HeightField::flat(dims, -7.5);
        let flow = FlowField::compute(&hf, &graph);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut stats = ErosionStats::default();

        let mut droplet = Droplet::new(dims.index(1, 2), 3.0);
        let (steps, capped) =
            run_droplet(&mut droplet, &mut hf, &flow, &graph, &ErosionParams::default(), &mut rng, &mut stats);

        assert_eq!(steps, 1);
        assert!(!capped);
        assert_eq!(droplet.mass, 0.0);
        assert_eq!(droplet.sediment, 0.0);
        assert!(hf.heights().all(|h| h == -7.5));
    }

    #[test]
    fn test_mass_never_increases() {
        let (mut hf, graph) = ramp(32, 8, 3.0);
        let flow = FlowField::compute(&hf, &graph);
        let mut rng = ChaCha8Rng::seed_from_u64(77);
        let mut stats = ErosionStats::default();
        let dims = hf.dims();

        let mut droplet = Droplet::new(dims.index(2, 4), 10.0);
        let mut last = droplet.mass;
        let mut steps = 0;
        while droplet.is_alive() {
            droplet.step(&mut hf, &flow, &graph, &mut rng, &mut stats);
            assert!(droplet.mass <= last, "mass grew from {} to {}", last, droplet.mass);
            assert!(droplet.mass >= 0.0);
            last = droplet.mass;
            steps += 1;
            assert!(steps < 1000, "droplet never evaporated");
        }
        assert_eq!(droplet.mass, 0.0);
        // A drop of 3 per step keeps 8/9 of the mass, so the droplet travels.
        assert!(steps > 1);
    }

    #[test]
    fn test_step_cap_zeroes_mass() {
        let (mut hf, graph) = ramp(32, 8, 3.0);
        let flow = FlowField::compute(&hf, &graph);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut stats = ErosionStats::default();
        let params = ErosionParams { max_steps: 2, ..Default::default() };

        let mut droplet = Droplet::new(hf.dims().index(1, 1), 10.0);
        let (steps, capped) = run_droplet(&mut droplet, &mut hf, &flow, &graph, &params, &mut rng, &mut stats);
        assert_eq!(steps, 2);
        assert!(capped);
        assert!(!droplet.is_alive());
    }

    #[test]
    fn test_droplets_erode_slope() {
        let (mut hf, graph) = ramp(24, 24, 2.0);
        let before = hf.clone();
        let flow = FlowField::compute(&hf, &graph);
        let mut rng = ChaCha8Rng::seed_from_u64(12345);
        let params = ErosionParams { iterations: 500, ..Default::default() };

        let stats = simulate(&mut hf, &flow, &graph, &params, &mut rng);

        assert_eq!(stats.iterations, 500);
        assert!(stats.total_eroded > 0.0);
        assert!(stats.steps_taken >= 500);
        assert_eq!(stats.capped_droplets, 0);
        assert!(hf.heights().all(|h| h.is_finite()));
        assert_ne!(hf, before);
        assert_eq!(hf.len(), before.len());
    }

    #[test]
    fn test_same_seed_same_terrain() {
        let (hf, graph) = ramp(16, 16, 2.5);
        let flow = FlowField::compute(&hf, &graph);
        let params = ErosionParams { iterations: 200, ..Default::default() };

        let mut a = hf.clone();
        let mut b = hf.clone();
        simulate(&mut a, &flow, &graph, &params, &mut ChaCha8Rng::seed_from_u64(3));
        simulate(&mut b, &flow, &graph, &params, &mut ChaCha8Rng::seed_from_u64(3));
        assert_eq!(a, b);

        let mut c = hf.clone();
        simulate(&mut c, &flow, &graph, &params, &mut ChaCha8Rng::seed_from_u64(4));
        assert_ne!(a, c);
    }

    #[test]
    fn test_oversaturated_droplet_deposits_on_ring() {
        let (mut hf, graph) = ramp(10, 10, 3.0);
        let flow = FlowField::compute(&hf, &graph);
        let before = hf.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let mut stats = ErosionStats::default();
        let cell = hf.dims().index(4, 4);

        let mut droplet = Droplet { index: cell, sediment: 50.0, mass: 9.0 };
        droplet.step(&mut hf, &flow, &graph, &mut rng, &mut stats);

        // mass 9 on a drop of 3 evaporates to 8, leaving 42 excess
        assert_eq!(droplet.mass, 8.0);
        for &n in graph.neighbors(cell) {
            let added = hf.height(n) - before.height(n);
            assert!(added >= 42.0 / 16.0 * 0.75 - 1e-4 && added <= 42.0 / 16.0 * 1.25 + 1e-4);
        }
        let centre = hf.height(cell) - before.height(cell);
        assert!(centre >= 42.0 * 0.75 / 2.0 - 1e-4 && centre <= 42.0 * 1.25 / 2.0 + 1e-4);
        assert!(droplet.sediment < 50.0);
        assert!(stats.total_deposited > 0.0);
        assert_eq!(droplet.index, flow.cell(cell).target);
    }

    #[test]
    fn test_droplets_run_in_order_on_shared_heights() {
        let (hf, graph) = ramp(16, 16, 3.0);
        let flow = FlowField::compute(&hf, &graph);
        let params = ErosionParams { iterations: 2, ..Default::default() };

        let mut batched = hf.clone();
        let batch_stats = simulate(&mut batched, &flow, &graph, &params, &mut ChaCha8Rng::seed_from_u64(31));

        // Same two droplets by hand: one RNG, one heightfield, one after the other.
        let mut manual = hf.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(31);
        let mut stats = ErosionStats::default();
        let mut first = Droplet::spawn(manual.len(), &params, &mut rng);
        run_droplet(&mut first, &mut manual, &flow, &graph, &params, &mut rng, &mut stats);
        let mut second = Droplet::spawn(manual.len(), &params, &mut rng);
        run_droplet(&mut second, &mut manual, &flow, &graph, &params, &mut rng, &mut stats);

        assert_eq!(batched, manual);
        assert_eq!(batch_stats.steps_taken, stats.steps_taken);
        assert_eq!(batch_stats.total_eroded, stats.total_eroded);
    }

    #[test]
    fn test_later_droplet_uses_frozen_drop() {
        let (mut hf, graph) = ramp(10, 10, 3.0);
        let flow = FlowField::compute(&hf, &graph);
        let cell = hf.dims().index(4, 4);
        let target = flow.cell(cell).target;
        let frozen_drop = flow.cell(cell).drop;
        assert_eq!(frozen_drop, 3.0);

        // An earlier droplet piled sediment on the target: live, it is now uphill.
        hf.add_height(target, 8.0);
        assert!(hf.height(target) > hf.height(cell));

        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut stats = ErosionStats::default();
        for _ in 0..50 {
            let before = hf.height(cell);
            let mut droplet = Droplet::new(cell, 9.0);
            droplet.step(&mut hf, &flow, &graph, &mut rng, &mut stats);

            // Evaporation and the erosion cap both come from the frozen drop of 3.
            assert_eq!(droplet.mass, 8.0);
            let removed = before - hf.height(cell);
            assert!(removed >= 0.0 && removed <= frozen_drop + 1e-5, "eroded {}", removed);
            assert_eq!(droplet.index, target);
        }
        assert!(stats.total_eroded > 0.0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "invalid erosion params")]
    fn test_simulate_rejects_inverted_mass_range() {
        let (mut hf, graph) = ramp(4, 4, 1.0);
        let flow = FlowField::compute(&hf, &graph);
        let params = ErosionParams { min_mass: 5.0, flow_scale: 1.0, ..Default::default() };
        simulate(&mut hf, &flow, &graph, &params, &mut ChaCha8Rng::seed_from_u64(0));
    }
}
