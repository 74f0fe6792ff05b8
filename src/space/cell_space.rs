/// ==============================================================================================
/// ==================================== Lattice Graph (CSR) =====================================
/// ==============================================================================================
use serde::{Deserialize, Serialize};

use crate::error::PottsError;

/// Maximum number of lattice axes.
pub const MAX_DIMS: usize = 8;

/// Neighborhood kind on the grid graph.
///     - `VonNeumann`: axis-aligned unit steps (2N neighbors in the interior)
///     - `Moore`: all nonzero offsets in {-1, 0, 1}^N (3^N - 1 neighbors in the interior)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Neighborhood {
    VonNeumann,
    Moore,
}

/// Boundary condition, uniform or per axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Periodicity {
    All(bool),
    PerAxis(Vec<bool>),
}

impl From<bool> for Periodicity {
    fn from(value: bool) -> Self {
        Periodicity::All(value)
    }
}

/// N-dimensional regular grid exposed as an undirected graph.
///
/// Adjacency is precomputed at construction into compressed sparse row form,
/// so `neighbors(v)` is a slice lookup. Periodic axes wrap by modular
/// arithmetic on grid coordinates; clamped axes omit out-of-grid neighbors.
/// Every vertex carries a cell id (`0` = medium) and a cell type tag.
#[derive(Debug, Clone)]
pub struct CellSpace {
    shape: Vec<usize>,     // extents d_1..d_N
    strides: Vec<usize>,   // row-major strides
    periodic: Vec<bool>,   // per-axis wrap flag
    neighborhood: Neighborhood,
    row_offsets: Vec<u32>, // CSR row starts, len V + 1
    col_indices: Vec<u32>, // CSR neighbor lists
    node_id: Vec<u32>,     // cell id per vertex, 0 = medium
    node_type: Vec<u32>,   // cell type per vertex, 0 = medium
    edge_count: usize,
}

impl CellSpace {
    /// Build the lattice graph.
    ///     Inputs:
    ///         - `shape`: positive extents, 1..=MAX_DIMS axes
    ///         - `periodicity`: single flag or one flag per axis
    ///         - `neighborhood`: von Neumann or Moore
    /// Degenerate wraps (periodic extent 1 or 2) are deduplicated so the
    /// adjacency stays a simple graph with no self loops.
    pub fn new(
        shape: &[usize],
        periodicity: impl Into<Periodicity>,
        neighborhood: Neighborhood,
    ) -> Result<Self, PottsError> {
        if shape.is_empty() || shape.len() > MAX_DIMS || shape.iter().any(|&d| d == 0) {
            return Err(PottsError::BadShape {
                shape: shape.to_vec(),
                max: MAX_DIMS,
            });
        }

        let vertices: u128 = shape.iter().map(|&d| d as u128).product();
        if vertices > u32::MAX as u128 {
            return Err(PottsError::LatticeTooLarge {
                vertices,
                max: u32::MAX as u64,
            });
        }
        let v_count = vertices as usize;

        let periodic = match periodicity.into() {
            Periodicity::All(flag) => vec![flag; shape.len()],
            Periodicity::PerAxis(flags) => {
                if flags.len() != shape.len() {
                    return Err(PottsError::PeriodicityArity {
                        got: flags.len(),
                        expected: shape.len(),
                    });
                }
                flags
            }
        };

        // Row-major strides: last axis varies fastest.
        let mut strides = vec![1usize; shape.len()];
        for axis in (0..shape.len().saturating_sub(1)).rev() {
            strides[axis] = strides[axis + 1] * shape[axis + 1];
        }

        let offsets = neighbor_offsets(shape.len(), neighborhood);

        let mut row_offsets = Vec::with_capacity(v_count + 1);
        let mut col_indices = Vec::with_capacity(v_count * offsets.len());
        row_offsets.push(0u32);

        let mut coords = [0usize; MAX_DIMS];
        let mut scratch: Vec<u32> = Vec::with_capacity(offsets.len());
        for v in 0..v_count {
            decode(v, &strides, shape.len(), &mut coords);
            scratch.clear();
            'offsets: for offset in &offsets {
                let mut w = 0usize;
                for axis in 0..shape.len() {
                    let extent = shape[axis] as i64;
                    let mut c = coords[axis] as i64 + offset[axis];
                    if c < 0 || c >= extent {
                        if !periodic[axis] {
                            continue 'offsets; // clamped axis: neighbor omitted
                        }
                        c = c.rem_euclid(extent);
                    }
                    w += c as usize * strides[axis];
                }
                if w != v {
                    scratch.push(w as u32);
                }
            }
            scratch.sort_unstable();
            scratch.dedup();
            col_indices.extend_from_slice(&scratch);
            row_offsets.push(col_indices.len() as u32);
        }

        // Wrap and clamp are both symmetric, so every edge appears twice.
        let edge_count = col_indices.len() / 2;

        Ok(Self {
            shape: shape.to_vec(),
            strides,
            periodic,
            neighborhood,
            row_offsets,
            col_indices,
            node_id: vec![0; v_count],
            node_type: vec![0; v_count],
            edge_count,
        })
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.node_id.len()
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[inline]
    pub fn is_periodic(&self, axis: usize) -> bool {
        self.periodic[axis]
    }

    #[inline]
    pub fn periodic(&self) -> &[bool] {
        &self.periodic
    }

    #[inline]
    pub fn neighborhood(&self) -> Neighborhood {
        self.neighborhood
    }

    #[inline]
    pub fn neighbors(&self, v: usize) -> &[u32] {
        let lo = self.row_offsets[v] as usize;
        let hi = self.row_offsets[v + 1] as usize;
        &self.col_indices[lo..hi]
    }

    #[inline]
    pub fn degree(&self, v: usize) -> usize {
        (self.row_offsets[v + 1] - self.row_offsets[v]) as usize
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// All edges, each reported once with `u < w`.
    pub fn edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (0..self.vertex_count()).flat_map(move |u| {
            self.neighbors(u)
                .iter()
                .filter(move |&&w| (w as usize) > u)
                .map(move |&w| (u as u32, w))
        })
    }

    #[inline]
    pub fn node_id(&self, v: usize) -> u32 {
        self.node_id[v]
    }

    #[inline]
    pub fn node_type(&self, v: usize) -> u32 {
        self.node_type[v]
    }

    #[inline]
    pub fn ids(&self) -> &[u32] {
        &self.node_id
    }

    #[inline]
    pub fn types(&self) -> &[u32] {
        &self.node_type
    }

    /// Overwrite the cell id and type at one vertex.
    /// This is the raw write used by the engine commit path and by replay;
    /// derived per-cell columns must be resynced after any other use.
    #[inline]
    pub fn set(&mut self, v: usize, id: u32, ty: u32) {
        self.node_id[v] = id;
        self.node_type[v] = ty;
    }

    /// Decode a vertex index into grid coordinates (first `ndim` slots of `out`).
    #[inline]
    pub fn coords_into(&self, v: usize, out: &mut [usize; MAX_DIMS]) {
        decode(v, &self.strides, self.shape.len(), out);
    }

    /// Encode grid coordinates into a vertex index.
    pub fn vertex_at(&self, coords: &[usize]) -> Option<usize> {
        if coords.len() != self.shape.len() {
            return None;
        }
        let mut v = 0usize;
        for axis in 0..coords.len() {
            if coords[axis] >= self.shape[axis] {
                return None;
            }
            v += coords[axis] * self.strides[axis];
        }
        Some(v)
    }
}

#[inline]
fn decode(v: usize, strides: &[usize], ndim: usize, out: &mut [usize; MAX_DIMS]) {
    let mut rest = v;
    for axis in 0..ndim {
        out[axis] = rest / strides[axis];
        rest %= strides[axis];
    }
}

// Offset vectors defining the neighborhood, as coordinate deltas.
fn neighbor_offsets(ndim: usize, neighborhood: Neighborhood) -> Vec<[i64; MAX_DIMS]> {
    match neighborhood {
        Neighborhood::VonNeumann => {
            let mut offsets = Vec::with_capacity(2 * ndim);
            for axis in 0..ndim {
                for sign in [-1i64, 1] {
                    let mut offset = [0i64; MAX_DIMS];
                    offset[axis] = sign;
                    offsets.push(offset);
                }
            }
            offsets
        }
        Neighborhood::Moore => {
            let count = 3usize.pow(ndim as u32);
            let mut offsets = Vec::with_capacity(count - 1);
            for code in 0..count {
                let mut offset = [0i64; MAX_DIMS];
                let mut rest = code;
                for slot in offset.iter_mut().take(ndim) {
                    *slot = (rest % 3) as i64 - 1;
                    rest /= 3;
                }
                if offset[..ndim].iter().any(|&d| d != 0) {
                    offsets.push(offset);
                }
            }
            offsets
        }
    }
}
