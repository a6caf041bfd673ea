//! Grid dimensions and the flattened vertex-index convention.
//!
//! A terrain of `width x depth` quads has `(width + 1) x (depth + 1)` vertices.
//! Vertices are stored row-major with a row length of `width + 1`, so every
//! `(x, z)` pair maps to exactly one index in `[0, cell_count)`.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};

/// How the neighbor graph wraps at the grid border.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    /// Wrap with period `width x depth`. The last column and row wrap onto
    /// column/row 0 from their `+1` side, which makes adjacency asymmetric
    /// along the top and right border. Matches the classic behaviour.
    #[default]
    Legacy,
    /// Wrap with period `(width + 1) x (depth + 1)`: a seamless torus over
    /// every vertex.
    Torus,
}

impl Topology {
    pub fn all() -> &'static [Self] {
        &[Self::Legacy, Self::Torus]
    }

    /// Wrap moduli for the x and z axes.
    pub fn moduli(&self, dims: GridDims) -> (usize, usize) {
        match self {
            Self::Legacy => (dims.width(), dims.depth()),
            Self::Torus => (dims.row_len(), dims.rows()),
        }
    }
}

impl std::fmt::Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy"),
            Self::Torus => write!(f, "torus"),
        }
    }
}

impl std::str::FromStr for Topology {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "legacy" => Ok(Self::Legacy),
            "torus" => Ok(Self::Torus),
            other => Err(format!("unknown topology '{}', expected legacy or torus", other)),
        }
    }
}

/// Validated grid size, in quads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridDims {
    width: usize,
    depth: usize,
}

impl GridDims {
    /// Both dimensions must be at least 1; an empty grid is a configuration error.
    /// Every vertex index must also fit the `u32` triangle index buffer.
    pub fn new(width: usize, depth: usize) -> Result<Self> {
        if width == 0 || depth == 0 {
            return Err(TerrainError::InvalidDimensions { width, depth });
        }
        let vertices = width
            .checked_add(1)
            .zip(depth.checked_add(1))
            .and_then(|(row_len, rows)| row_len.checked_mul(rows));
        match vertices {
            Some(n) if n <= u32::MAX as usize => Ok(Self { width, depth }),
            _ => Err(TerrainError::GridTooLarge { width, depth }),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Vertices per row (`width + 1`).
    pub fn row_len(&self) -> usize {
        self.width + 1
    }

    /// Number of vertex rows (`depth + 1`).
    pub fn rows(&self) -> usize {
        self.depth + 1
    }

    pub fn cell_count(&self) -> usize {
        self.row_len() * self.rows()
    }

    pub fn quad_count(&self) -> usize {
        self.width * self.depth
    }

    #[inline]
    pub fn index(&self, x: usize, z: usize) -> usize {
        debug_assert!(x <= self.width && z <= self.depth, "({}, {}) outside grid", x, z);
        x + z * self.row_len()
    }

    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.row_len(), index / self.row_len())
    }

    /// Iterate all vertices as `(index, x, z)` in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, usize)> {
        let row_len = self.row_len();
        (0..self.cell_count()).map(move |idx| (idx, idx % row_len, idx / row_len))
    }
}

/// `((v mod m) + m) mod m`, for signed offsets around a grid coordinate.
#[inline]
pub fn wrap(v: isize, m: usize) -> usize {
    v.rem_euclid(m as isize) as usize
}
