//! Mesh assembly for the rendering side: vertices, triangle indices and
//! per-vertex erosion colours.
//!
//! Rendering itself is out of scope; anything that accepts a [`MeshData`]
//! snapshot implements [`MeshSink`].

use serde::{Deserialize, Serialize};

use crate::erosion::FlowField;
use crate::error::Result;
use crate::grid::GridDims;
use crate::heightfield::{HeightField, Vertex};

/// Linear RGBA colour with components in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const GREEN: Rgba = Rgba::new(0.0, 1.0, 0.0, 1.0);
    pub const RED: Rgba = Rgba::new(1.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Unclamped linear interpolation; callers pick `t`.
    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        Rgba {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

/// How a flow drop becomes an interpolation parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Raw drop, clamped to `[0, 1]`
    #[default]
    Clamped,
    /// Drop divided by the largest drop of the pass
    Normalized,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorParams {
    /// Colour of flat ground and sinks
    pub low: Rgba,
    /// Colour of the steepest drops
    pub high: Rgba,
    pub mode: ColorMode,
}

impl Default for ColorParams {
    fn default() -> Self {
        Self { low: Rgba::GREEN, high: Rgba::RED, mode: ColorMode::Clamped }
    }
}

/// One colour per vertex, lerped from `low` to `high` by flow drop.
pub fn flow_colors(flow: &FlowField, params: &ColorParams) -> Vec<Rgba> {
    let scale = match params.mode {
        ColorMode::Clamped => 1.0,
        ColorMode::Normalized => {
            let max = flow.max_drop();
            if max > 0.0 { 1.0 / max } else { 0.0 }
        }
    };
    flow.cells()
        .iter()
        .map(|cell| params.low.lerp(params.high, (cell.drop * scale).clamp(0.0, 1.0)))
        .collect()
}

/// Two counter-clockwise triangles per grid quad. `GridDims::new` keeps
/// every vertex index within `u32`.
pub fn triangle_indices(dims: GridDims) -> Vec<u32> {
    let row = dims.row_len() as u32;
    let mut triangles = Vec::with_capacity(6 * dims.quad_count());
    for z in 0..dims.depth() {
        for x in 0..dims.width() {
            let v = dims.index(x, z) as u32;
            triangles.extend_from_slice(&[v, v + row, v + 1, v + 1, v + row, v + row + 1]);
        }
    }
    triangles
}

/// Snapshot handed to the renderer after a pass.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshData {
    pub dims: GridDims,
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<u32>,
    pub colors: Vec<Rgba>,
}

impl MeshData {
    pub fn new(heightfield: &HeightField, triangles: &[u32], colors: &[Rgba]) -> Self {
        Self {
            dims: heightfield.dims(),
            vertices: heightfield.vertices().to_vec(),
            triangles: triangles.to_vec(),
            colors: colors.to_vec(),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }
}

/// Downstream consumer of terrain meshes (renderer, exporter, ...).
pub trait MeshSink {
    fn submit(&mut self, mesh: &MeshData) -> Result<()>;
}

/// Keeps the most recent mesh; for headless runs and tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub last: Option<MeshData>,
    pub submissions: usize,
}

impl MeshSink for RecordingSink {
    fn submit(&mut self, mesh: &MeshData) -> Result<()> {
        self.last = Some(mesh.clone());
        self.submissions += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Topology;
    use crate::neighbors::NeighborGraph;

    #[test]
    fn test_triangle_count_and_range() {
        let dims = GridDims::new(2, 2).unwrap();
        let tris = triangle_indices(dims);
        assert_eq!(tris.len(), 24);
        assert!(tris.iter().all(|&i| i <= 8));
        assert_eq!(&tris[..6], &[0, 3, 1, 1, 3, 4]);
        // Second row starts one vertex past the end of the first.
        assert_eq!(tris[12], 3);
    }

    #[test]
    fn test_every_quad_corner_is_used() {
        let dims = GridDims::new(5, 3).unwrap();
        let tris = triangle_indices(dims);
        let mut used = vec![false; dims.cell_count()];
        for &i in &tris {
            used[i as usize] = true;
        }
        assert!(used.iter().all(|&u| u));
    }

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(Rgba::GREEN.lerp(Rgba::RED, 0.0), Rgba::GREEN);
        assert_eq!(Rgba::GREEN.lerp(Rgba::RED, 1.0), Rgba::RED);
        assert_eq!(Rgba::new(0.5, 0.5, 0.5, 1.0).to_rgba8(), [128, 128, 128, 255]);
    }

    #[test]
    fn test_colors_by_mode() {
        let dims = GridDims::new(6, 6).unwrap();
        let graph = NeighborGraph::build(dims, Topology::Legacy);
        // A single 4-unit spike: its drop is 4, its neighbors and the rest are flat.
        let spike = dims.index(3, 3);
        let hf = HeightField::from_fn(dims, |x, z| if (x, z) == (3, 3) { 4.0 } else { 0.0 });
        let flow = FlowField::compute(&hf, &graph);

        let clamped = flow_colors(&flow, &ColorParams::default());
        assert_eq!(clamped.len(), hf.len());
        assert_eq!(clamped[spike], Rgba::RED);
        assert_eq!(clamped[0], Rgba::GREEN);

        let params = ColorParams { mode: ColorMode::Normalized, ..Default::default() };
        let normalized = flow_colors(&flow, &params);
        assert_eq!(normalized[spike], Rgba::RED);
        assert_eq!(normalized[0], Rgba::GREEN);
    }

    #[test]
    fn test_normalized_flat_is_low_colour() {
        let dims = GridDims::new(3, 3).unwrap();
        let graph = NeighborGraph::build(dims, Topology::Legacy);
        let flow = FlowField::compute(&HeightField::flat(dims, 1.0), &graph);
        let params = ColorParams { mode: ColorMode::Normalized, ..Default::default() };
        assert!(flow_colors(&flow, &params).iter().all(|&c| c == Rgba::GREEN));
    }

    #[test]
    fn test_recording_sink_keeps_last() {
        let dims = GridDims::new(1, 1).unwrap();
        let hf = HeightField::flat(dims, 0.0);
        let mesh = MeshData::new(&hf, &triangle_indices(dims), &[Rgba::GREEN; 4]);
        let mut sink = RecordingSink::default();
        sink.submit(&mesh).unwrap();
        sink.submit(&mesh).unwrap();
        assert_eq!(sink.submissions, 2);
        assert_eq!(sink.last.as_ref().map(|m| m.triangle_count()), Some(2));
    }
}
