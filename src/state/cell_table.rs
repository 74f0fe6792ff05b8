/// ==============================================================================================
/// ================================ Column-Oriented Cell Table ==================================
/// ==============================================================================================
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::PottsError;
use crate::space::MAX_DIMS;

/// Cell id of the background region.
pub const MEDIUM: u32 = 0;

/// Sentinel desired volume for the medium row. Penalties skip id 0, so the
/// value never enters an energy term.
pub const MEDIUM_DESIRED_VOLUME: i64 = i64::MAX;

/// Declarative description of the initial cell population.
///
/// Groups are given as parallel vectors: one name, desired volume, and count
/// per group, with single-entry vectors broadcast across groups. Group `i`
/// becomes cell type `i + 1`; type 0 is the medium.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellState {
    names: Vec<String>,            // one entry per cell (groups expanded)
    type_ids: Vec<u32>,
    desired_volumes: Vec<i64>,
    desired_perimeters: Vec<i64>,
    positions: Option<Vec<Vec<f64>>>,
    extra: BTreeMap<String, Vec<f64>>,
}

impl CellState {
    /// One row per cell, types assigned per group.
    ///     Inputs:
    ///         - `names`: one per group, or a single name broadcast
    ///         - `desired_volumes`: one per group, or a single value broadcast
    ///         - `counts`: cells per group
    pub fn new(
        names: &[&str],
        desired_volumes: &[i64],
        counts: &[usize],
    ) -> Result<Self, PottsError> {
        let groups = counts.len();
        let pick = |len: usize, what: &'static str| -> Result<(), PottsError> {
            if len == 1 || len == groups {
                Ok(())
            } else {
                Err(PottsError::GroupArity {
                    what,
                    got: len,
                    expected: groups,
                })
            }
        };
        if groups == 0 {
            return Err(PottsError::GroupArity {
                what: "count",
                got: 0,
                expected: 1,
            });
        }
        pick(names.len(), "name")?;
        pick(desired_volumes.len(), "desired_volume")?;

        let mut expanded_names = Vec::new();
        let mut type_ids = Vec::new();
        let mut volumes = Vec::new();
        for (group, &count) in counts.iter().enumerate() {
            let name = names[if names.len() == 1 { 0 } else { group }];
            let volume = desired_volumes[if desired_volumes.len() == 1 { 0 } else { group }];
            for _ in 0..count {
                expanded_names.push(name.to_string());
                type_ids.push(group as u32 + 1);
                volumes.push(volume);
            }
        }
        let cells = expanded_names.len();

        Ok(Self {
            names: expanded_names,
            type_ids,
            desired_volumes: volumes,
            desired_perimeters: vec![0; cells],
            positions: None,
            extra: BTreeMap::new(),
        })
    }

    /// Desired perimeters: one per cell, or a single value broadcast.
    pub fn with_desired_perimeters(mut self, perimeters: &[i64]) -> Result<Self, PottsError> {
        match perimeters.len() {
            1 => self.desired_perimeters.fill(perimeters[0]),
            n if n == self.names.len() => self.desired_perimeters.copy_from_slice(perimeters),
            n => {
                return Err(PottsError::GroupArity {
                    what: "desired_perimeter",
                    got: n,
                    expected: self.names.len(),
                });
            }
        }
        Ok(self)
    }

    /// Seed centroids in lattice coordinates, one per cell.
    pub fn with_positions(mut self, positions: Vec<Vec<f64>>) -> Result<Self, PottsError> {
        if positions.len() != self.names.len() {
            return Err(PottsError::GroupArity {
                what: "position",
                got: positions.len(),
                expected: self.names.len(),
            });
        }
        self.positions = Some(positions);
        Ok(self)
    }

    /// Attach a user column, carried verbatim into the table (medium row gets 0).
    pub fn with_column(mut self, name: &str, values: &[f64]) -> Result<Self, PottsError> {
        if values.len() != self.names.len() {
            return Err(PottsError::GroupArity {
                what: "extra column",
                got: values.len(),
                expected: self.names.len(),
            });
        }
        self.extra.insert(name.to_string(), values.to_vec());
        Ok(self)
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn positions(&self) -> Option<&[Vec<f64>]> {
        self.positions.as_deref()
    }

    #[inline]
    pub fn total_desired_volume(&self) -> i64 {
        self.desired_volumes
            .iter()
            .fold(0i64, |acc, &v| acc.saturating_add(v))
    }
}

/// A new row for [`CellTable::add_cell`]; volume starts at zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellRecord {
    pub name: String,
    pub type_id: u32,
    pub desired_volume: i64,
    pub desired_perimeter: i64,
}

/// Read-only view of one row.
#[derive(Debug, Clone, Copy)]
pub struct CellRow<'a> {
    pub id: u32,
    pub name: &'a str,
    pub type_id: u32,
    pub volume: i64,
    pub desired_volume: i64,
    pub perimeter: i64,
    pub desired_perimeter: i64,
}

/// Column-oriented per-cell state.
///
/// Row 0 is the medium. `volume`, `perimeter`, and the centroid sums are
/// derived columns kept current by the engine commit path; everything else is
/// configuration. User columns are opaque f64 vectors carried verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellTable {
    names: Vec<String>,
    type_ids: Vec<u32>,
    volumes: Vec<i64>,
    desired_volumes: Vec<i64>,
    perimeters: Vec<i64>,
    desired_perimeters: Vec<i64>,
    coord_sums: Vec<f64>, // rows x ndim, flattened
    ndim: usize,
    extra: BTreeMap<String, Vec<f64>>,
}

impl CellTable {
    /// Materialize the table from a population description; the medium row is
    /// prepended and its volume set to the full lattice (nothing placed yet).
    pub fn from_state(state: &CellState, ndim: usize, vertex_count: usize) -> Self {
        let rows = state.cell_count() + 1;

        let mut names = Vec::with_capacity(rows);
        let mut type_ids = Vec::with_capacity(rows);
        let mut desired_volumes = Vec::with_capacity(rows);
        let mut desired_perimeters = Vec::with_capacity(rows);

        names.push("Medium".to_string());
        type_ids.push(MEDIUM);
        desired_volumes.push(MEDIUM_DESIRED_VOLUME);
        desired_perimeters.push(0);

        names.extend(state.names.iter().cloned());
        type_ids.extend_from_slice(&state.type_ids);
        desired_volumes.extend_from_slice(&state.desired_volumes);
        desired_perimeters.extend_from_slice(&state.desired_perimeters);

        let mut volumes = vec![0i64; rows];
        volumes[0] = vertex_count as i64;

        let mut extra = BTreeMap::new();
        for (name, values) in &state.extra {
            let mut column = Vec::with_capacity(rows);
            column.push(0.0);
            column.extend_from_slice(values);
            extra.insert(name.clone(), column);
        }

        Self {
            names,
            type_ids,
            volumes,
            desired_volumes,
            perimeters: vec![0; rows],
            desired_perimeters,
            coord_sums: vec![0.0; rows * ndim],
            ndim,
            extra,
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.names.len()
    }

    /// Number of non-medium cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.rows() - 1
    }

    /// Highest cell type id in use (0 when only medium exists).
    #[inline]
    pub fn type_count(&self) -> usize {
        self.type_ids.iter().copied().max().unwrap_or(0) as usize
    }

    /// Number of distinct non-medium types present.
    pub fn distinct_types(&self) -> usize {
        let mut seen = vec![false; self.type_count() + 1];
        for &t in &self.type_ids {
            seen[t as usize] = true;
        }
        seen.iter().skip(1).filter(|&&s| s).count()
    }

    fn check_id(&self, id: u32) -> Result<usize, PottsError> {
        let row = id as usize;
        if row < self.rows() {
            Ok(row)
        } else {
            Err(PottsError::NoSuchCell { cell: id })
        }
    }

    #[inline]
    pub fn name(&self, id: u32) -> &str {
        &self.names[id as usize]
    }

    #[inline]
    pub fn type_id(&self, id: u32) -> u32 {
        self.type_ids[id as usize]
    }

    #[inline]
    pub fn volume(&self, id: u32) -> i64 {
        self.volumes[id as usize]
    }

    #[inline]
    pub fn desired_volume(&self, id: u32) -> i64 {
        self.desired_volumes[id as usize]
    }

    #[inline]
    pub fn perimeter(&self, id: u32) -> i64 {
        self.perimeters[id as usize]
    }

    #[inline]
    pub fn desired_perimeter(&self, id: u32) -> i64 {
        self.desired_perimeters[id as usize]
    }

    /// Centroid of the cell in lattice coordinates; `None` for the medium or
    /// an empty cell.
    pub fn position(&self, id: u32) -> Option<Vec<f64>> {
        let row = id as usize;
        if id == MEDIUM || row >= self.rows() || self.volumes[row] <= 0 {
            return None;
        }
        let volume = self.volumes[row] as f64;
        Some(
            self.coord_sums[row * self.ndim..(row + 1) * self.ndim]
                .iter()
                .map(|&s| s / volume)
                .collect(),
        )
    }

    /// Named-column read. `name` and `position` have typed accessors instead.
    pub fn get(&self, id: u32, column: &str) -> Result<f64, PottsError> {
        let row = self.check_id(id)?;
        match column {
            "type_id" => Ok(self.type_ids[row] as f64),
            "volume" => Ok(self.volumes[row] as f64),
            "desired_volume" => Ok(self.desired_volumes[row] as f64),
            "perimeter" => Ok(self.perimeters[row] as f64),
            "desired_perimeter" => Ok(self.desired_perimeters[row] as f64),
            _ => self
                .extra
                .get(column)
                .map(|values| values[row])
                .ok_or_else(|| PottsError::NoSuchColumn {
                    column: column.to_string(),
                }),
        }
    }

    /// Named-column write. Derived columns are read-only.
    pub fn set(&mut self, id: u32, column: &str, value: f64) -> Result<(), PottsError> {
        let row = self.check_id(id)?;
        match column {
            "desired_volume" => {
                self.desired_volumes[row] = value as i64;
                Ok(())
            }
            "desired_perimeter" => {
                self.desired_perimeters[row] = value as i64;
                Ok(())
            }
            "volume" | "perimeter" | "type_id" => Err(PottsError::ReadOnlyColumn {
                column: column.to_string(),
            }),
            _ => match self.extra.get_mut(column) {
                Some(values) => {
                    values[row] = value;
                    Ok(())
                }
                None => Err(PottsError::NoSuchColumn {
                    column: column.to_string(),
                }),
            },
        }
    }

    #[inline]
    pub fn extra_column(&self, name: &str) -> Option<&[f64]> {
        self.extra.get(name).map(|v| v.as_slice())
    }

    pub fn iter_cells(&self) -> impl Iterator<Item = CellRow<'_>> {
        (1..self.rows()).map(move |row| CellRow {
            id: row as u32,
            name: &self.names[row],
            type_id: self.type_ids[row],
            volume: self.volumes[row],
            desired_volume: self.desired_volumes[row],
            perimeter: self.perimeters[row],
            desired_perimeter: self.desired_perimeters[row],
        })
    }

    /// Append a row; the new cell starts empty and gets 0 in every user column.
    pub fn add_cell(&mut self, record: CellRecord) -> u32 {
        self.names.push(record.name);
        self.type_ids.push(record.type_id);
        self.volumes.push(0);
        self.desired_volumes.push(record.desired_volume);
        self.perimeters.push(0);
        self.desired_perimeters.push(record.desired_perimeter);
        self.coord_sums.extend(std::iter::repeat_n(0.0, self.ndim));
        for values in self.extra.values_mut() {
            values.push(0.0);
        }
        (self.rows() - 1) as u32
    }

    /// Drop a row. Only legal for an empty, non-medium cell; ids above the
    /// removed row shift down by one, and the caller owns renumbering every
    /// lattice reference.
    pub fn remove_cell(&mut self, id: u32) -> Result<(), PottsError> {
        let row = self.check_id(id)?;
        if id == MEDIUM {
            return Err(PottsError::NoSuchCell { cell: id });
        }
        if self.volumes[row] != 0 {
            return Err(PottsError::RemoveNonEmpty {
                cell: id,
                volume: self.volumes[row],
            });
        }
        self.names.remove(row);
        self.type_ids.remove(row);
        self.volumes.remove(row);
        self.desired_volumes.remove(row);
        self.perimeters.remove(row);
        self.desired_perimeters.remove(row);
        self.coord_sums.drain(row * self.ndim..(row + 1) * self.ndim);
        for values in self.extra.values_mut() {
            values.remove(row);
        }
        Ok(())
    }

    // ---- engine-facing incremental updates -----------------------------------------------

    #[inline]
    pub(crate) fn bump_volume(&mut self, id: u32, delta: i64) {
        let row = id as usize;
        self.volumes[row] = self.volumes[row].saturating_add(delta);
    }

    #[inline]
    pub(crate) fn bump_perimeter(&mut self, id: u32, delta: i64) {
        let row = id as usize;
        self.perimeters[row] = self.perimeters[row].saturating_add(delta);
    }

    #[inline]
    pub(crate) fn shift_centroid(&mut self, id: u32, coords: &[usize; MAX_DIMS], sign: f64) {
        let row = id as usize * self.ndim;
        for axis in 0..self.ndim {
            self.coord_sums[row + axis] += sign * coords[axis] as f64;
        }
    }

    /// Zero every derived column ahead of a full recount.
    pub(crate) fn clear_derived(&mut self) {
        self.volumes.fill(0);
        self.perimeters.fill(0);
        self.coord_sums.fill(0.0);
    }
}
