//! PNG previews of a terrain: height via a spectral colormap and the
//! per-vertex erosion colours.

use std::path::{Path, PathBuf};

use image::{ImageBuffer, Rgb, RgbImage, Rgba as ImageRgba, RgbaImage};

use crate::error::Result;
use crate::grid::GridDims;
use crate::heightfield::HeightField;
use crate::mesh::{MeshData, MeshSink, Rgba};

/// Export a heightfield, normalised to its own min/max, one pixel per vertex.
pub fn export_heightmap<P: AsRef<Path>>(heightfield: &HeightField, path: P) -> Result<()> {
    render_heightmap(heightfield).save(path)?;
    Ok(())
}

pub fn render_heightmap(heightfield: &HeightField) -> RgbImage {
    render_heights(heightfield.dims(), |idx| heightfield.height(idx))
}

fn render_heights(dims: GridDims, height: impl Fn(usize) -> f32) -> RgbImage {
    let (min_h, max_h) = (0..dims.cell_count())
        .map(&height)
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), h| (lo.min(h), hi.max(h)));
    let range = (max_h - min_h).max(f32::EPSILON);

    ImageBuffer::from_fn(dims.row_len() as u32, dims.rows() as u32, |x, z| {
        let h = height(dims.index(x as usize, z as usize));
        Rgb(spectral_colormap(((h - min_h) / range).clamp(0.0, 1.0)))
    })
}

/// Export per-vertex colours laid out on the vertex grid.
pub fn export_flow_colors<P: AsRef<Path>>(
    heightfield: &HeightField,
    colors: &[Rgba],
    path: P,
) -> Result<()> {
    render_flow_colors(heightfield.dims(), colors).save(path)?;
    Ok(())
}

pub fn render_flow_colors(dims: GridDims, colors: &[Rgba]) -> RgbaImage {
    ImageBuffer::from_fn(dims.row_len() as u32, dims.rows() as u32, |x, z| {
        let idx = dims.index(x as usize, z as usize);
        ImageRgba(colors.get(idx).copied().unwrap_or(Rgba::GREEN).to_rgba8())
    })
}

/// Mesh sink that writes a heightmap and an erosion-colour PNG per submission.
pub struct PngSink {
    dir: PathBuf,
    prefix: String,
    frames: usize,
}

impl PngSink {
    /// Creates `dir` if needed.
    pub fn new<P: Into<PathBuf>>(dir: P, prefix: impl Into<String>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir, prefix: prefix.into(), frames: 0 })
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Paths of the heightmap and colour images for frame `frame` (1-based).
    pub fn frame_paths(&self, frame: usize) -> (PathBuf, PathBuf) {
        (
            self.dir.join(format!("{}_pass{:03}_height.png", self.prefix, frame)),
            self.dir.join(format!("{}_pass{:03}_colors.png", self.prefix, frame)),
        )
    }
}

impl MeshSink for PngSink {
    fn submit(&mut self, mesh: &MeshData) -> Result<()> {
        let (height_path, color_path) = self.frame_paths(self.frames + 1);
        render_heights(mesh.dims, |idx| mesh.vertices[idx].height).save(&height_path)?;
        render_flow_colors(mesh.dims, &mesh.colors).save(&color_path)?;
        self.frames += 1;
        log::debug!("wrote {} and {}", height_path.display(), color_path.display());
        Ok(())
    }
}

/// Spectral colormap (matplotlib style): dark blue -> cyan -> green -> yellow -> orange -> red
fn spectral_colormap(t: f32) -> [u8; 3] {
    let colors: [[f32; 3]; 11] = [
        [0.37, 0.31, 0.64],
        [0.20, 0.53, 0.74],
        [0.40, 0.76, 0.65],
        [0.67, 0.87, 0.64],
        [0.90, 0.96, 0.60],
        [1.00, 1.00, 0.75],
        [1.00, 0.88, 0.55],
        [0.99, 0.68, 0.38],
        [0.96, 0.43, 0.26],
        [0.84, 0.24, 0.31],
        [0.62, 0.00, 0.26],
    ];

    let t_scaled = t * 10.0;
    let idx = (t_scaled as usize).min(9);
    let frac = t_scaled - idx as f32;

    let c1 = colors[idx];
    let c2 = colors[idx + 1];

    [
        ((c1[0] + (c2[0] - c1[0]) * frac) * 255.0) as u8,
        ((c1[1] + (c2[1] - c1[1]) * frac) * 255.0) as u8,
        ((c1[2] + (c2[2] - c1[2]) * frac) * 255.0) as u8,
    ]
}
