/// ==============================================================================================
/// ==================================== Simulation State ========================================
/// ==============================================================================================
use ndarray::{ArrayD, IxDyn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use super::placement;
use super::{StepInfo, StepStats};
use crate::error::PottsError;
use crate::penalties::Penalty;
use crate::space::{CellSpace, ConnectivityGuard, MAX_DIMS};
use crate::state::{CellRecord, CellState, CellTable, Checkpoint, History, LatticeSnapshot};

/// Default Boltzmann temperature.
pub const DEFAULT_TEMPERATURE: f64 = 20.0;

/// A complete Cellular Potts simulation.
///
/// Owns the lattice, the per-cell table, the penalty list with its auxiliary
/// state, the connectivity scratch, the commit log, and the RNG. One value is
/// one independent simulation; separate values may run on separate threads.
pub struct CellPotts {
    pub(super) space: CellSpace,
    pub(super) table: CellTable,
    pub(super) penalties: Vec<Penalty>,
    pub(super) guard: ConnectivityGuard,
    pub(super) info: StepInfo,
    pub(super) history: History,
    pub(super) replay: LatticeSnapshot,
    pub(super) temperature: f64,
    pub(super) rng: ChaCha8Rng,
    pub(super) step: u64,
    pub(super) recording: bool,
    pub(super) stats: StepStats,
}

impl std::fmt::Debug for CellPotts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CellPotts")
            .field("shape", &self.space.shape())
            .field("cells", &self.table.cell_count())
            .field("penalties", &self.penalties.len())
            .field("step", &self.step)
            .field("temperature", &self.temperature)
            .field("recording", &self.recording)
            .finish_non_exhaustive()
    }
}

impl CellPotts {
    /// Build and place a simulation with an OS-entropy seed.
    pub fn new(
        space: CellSpace,
        initial_state: CellState,
        penalties: Vec<Penalty>,
    ) -> Result<Self, PottsError> {
        Self::with_rng(space, initial_state, penalties, ChaCha8Rng::from_os_rng())
    }

    /// Build and place a simulation reproducibly from a seed.
    pub fn seeded(
        space: CellSpace,
        initial_state: CellState,
        penalties: Vec<Penalty>,
        seed: u64,
    ) -> Result<Self, PottsError> {
        Self::with_rng(
            space,
            initial_state,
            penalties,
            ChaCha8Rng::seed_from_u64(seed),
        )
    }

    fn with_rng(
        mut space: CellSpace,
        initial_state: CellState,
        penalties: Vec<Penalty>,
        mut rng: ChaCha8Rng,
    ) -> Result<Self, PottsError> {
        let table = CellTable::from_state(
            &initial_state,
            space.ndim(),
            space.vertex_count(),
        );
        for penalty in &penalties {
            penalty.validate(&space, &table)?;
        }
        placement::place_cells(&mut space, &table, initial_state.positions(), &mut rng)?;

        let vertex_count = space.vertex_count();
        let mut sim = Self {
            guard: ConnectivityGuard::new(vertex_count),
            space,
            table,
            penalties,
            info: StepInfo::default(),
            history: History::default(),
            replay: LatticeSnapshot::default(),
            temperature: DEFAULT_TEMPERATURE,
            rng,
            step: 0,
            recording: false,
            stats: StepStats::default(),
        };
        sim.resync();
        info!(
            shape = ?sim.space.shape(),
            cells = sim.table.cell_count(),
            penalties = sim.penalties.len(),
            "cell potts simulation placed"
        );
        Ok(sim)
    }

    /// Rebuild a simulation from a checkpoint. Penalties are re-supplied by
    /// the caller (auxiliary state like act memory restarts cold) and the RNG
    /// restarts from `seed`.
    pub fn from_checkpoint(
        checkpoint: Checkpoint,
        penalties: Vec<Penalty>,
        seed: u64,
    ) -> Result<Self, PottsError> {
        let mut space = CellSpace::new(
            &checkpoint.shape,
            crate::space::Periodicity::PerAxis(checkpoint.periodic.clone()),
            checkpoint.neighborhood,
        )?;
        let vertex_count = space.vertex_count();
        if checkpoint.node_id.len() != vertex_count || checkpoint.node_type.len() != vertex_count {
            return Err(PottsError::ShapeMismatch {
                what: "checkpoint lattice",
                got: vec![checkpoint.node_id.len()],
                expected: vec![vertex_count],
            });
        }
        for v in 0..vertex_count {
            space.set(v, checkpoint.node_id[v], checkpoint.node_type[v]);
        }
        for penalty in &penalties {
            penalty.validate(&space, &checkpoint.table)?;
        }

        let recording = checkpoint.history.has_baseline();
        let mut sim = Self {
            guard: ConnectivityGuard::new(vertex_count),
            space,
            table: checkpoint.table,
            penalties,
            info: StepInfo::default(),
            history: checkpoint.history,
            replay: LatticeSnapshot::default(),
            temperature: checkpoint.temperature,
            rng: ChaCha8Rng::seed_from_u64(seed),
            step: checkpoint.step,
            recording,
            stats: StepStats::default(),
        };
        sim.resync();
        Ok(sim)
    }

    /// Self-describing record of the current simulation state.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            shape: self.space.shape().to_vec(),
            periodic: self.space.periodic().to_vec(),
            neighborhood: self.space.neighborhood(),
            temperature: self.temperature,
            step: self.step,
            node_id: self.space.ids().to_vec(),
            node_type: self.space.types().to_vec(),
            table: self.table.clone(),
            history: self.history.clone(),
        }
    }

    // ---- accessors -----------------------------------------------------------------------

    #[inline]
    pub fn space(&self) -> &CellSpace {
        &self.space
    }

    #[inline]
    pub fn table(&self) -> &CellTable {
        &self.table
    }

    /// Mutable table access; only declarative columns are writable through it.
    #[inline]
    pub fn table_mut(&mut self) -> &mut CellTable {
        &mut self.table
    }

    #[inline]
    pub fn penalties(&self) -> &[Penalty] {
        &self.penalties
    }

    #[inline]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[inline]
    pub fn last_attempt(&self) -> &StepInfo {
        &self.info
    }

    #[inline]
    pub fn stats(&self) -> StepStats {
        self.stats
    }

    #[inline]
    pub fn step(&self) -> u64 {
        self.step
    }

    #[inline]
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn set_temperature(&mut self, temperature: f64) {
        self.temperature = temperature;
    }

    #[inline]
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Toggle history recording. The first enable preserves the current
    /// lattice as the replay baseline.
    pub fn set_recording(&mut self, on: bool) {
        if on {
            self.history
                .capture_baseline(self.space.ids(), self.space.types());
        }
        self.recording = on;
    }

    /// Number of non-medium cells.
    pub fn count_cells(&self) -> usize {
        self.table.cell_count()
    }

    /// Number of distinct non-medium cell types present.
    pub fn count_cell_types(&self) -> usize {
        self.table.distinct_types()
    }

    /// Cell ids as an array shaped like the lattice.
    pub fn array_ids(&self) -> ArrayD<u32> {
        ArrayD::from_shape_vec(IxDyn(self.space.shape()), self.space.ids().to_vec())
            .expect("lattice attribute arrays match the lattice shape")
    }

    /// Cell types as an array shaped like the lattice.
    pub fn array_types(&self) -> ArrayD<u32> {
        ArrayD::from_shape_vec(IxDyn(self.space.shape()), self.space.types().to_vec())
            .expect("lattice attribute arrays match the lattice shape")
    }

    /// Reconstruct the lattice as of model step `time` from the commit log.
    /// The returned snapshot is a reusable scratch buffer; copy it to retain.
    pub fn lattice_at(&mut self, time: i64) -> Result<&LatticeSnapshot, PottsError> {
        if time < 0 {
            return Err(PottsError::NegativeTime { time });
        }
        self.history.replay_into(time as u64, &mut self.replay)?;
        Ok(&self.replay)
    }

    // ---- structural mutations ------------------------------------------------------------

    /// Append an empty cell row; place it afterwards with [`Self::set_node`].
    pub fn add_cell(&mut self, record: CellRecord) -> u32 {
        self.table.add_cell(record)
    }

    /// Remove an empty cell row. Ids above it shift down by one, so the
    /// lattice is renumbered; refused while recording, because the shift
    /// would silently invalidate the log.
    pub fn remove_cell(&mut self, id: u32) -> Result<(), PottsError> {
        if self.recording {
            return Err(PottsError::RemoveWhileRecording { cell: id });
        }
        self.table.remove_cell(id)?;
        for v in 0..self.space.vertex_count() {
            let current = self.space.node_id(v);
            if current > id {
                self.space.set(v, current - 1, self.space.node_type(v));
            }
        }
        Ok(())
    }

    /// Overwrite one vertex outside the Metropolis path (initialization,
    /// division-style topology edits). Derived columns are fully recounted.
    pub fn set_node(&mut self, v: usize, cell_id: u32) -> Result<(), PottsError> {
        if cell_id as usize >= self.table.rows() {
            return Err(PottsError::NoSuchCell { cell: cell_id });
        }
        self.space.set(v, cell_id, self.table.type_id(cell_id));
        self.resync();
        Ok(())
    }

    // ---- derived-column maintenance ------------------------------------------------------

    /// Full recount of every derived column (volumes, perimeters, centroids)
    /// from the lattice. Required after any non-MH mutation.
    pub fn resync(&mut self) {
        self.table.clear_derived();
        let mut coords = [0usize; MAX_DIMS];
        for v in 0..self.space.vertex_count() {
            let id = self.space.node_id(v);
            self.table.bump_volume(id, 1);
            self.space.coords_into(v, &mut coords);
            self.table.shift_centroid(id, &coords, 1.0);
        }
        for (u, w) in self.space.edges() {
            let id_u = self.space.node_id(u as usize);
            let id_w = self.space.node_id(w as usize);
            if id_u != id_w {
                self.table.bump_perimeter(id_u, 1);
                self.table.bump_perimeter(id_w, 1);
            }
        }
    }

    /// Check every global invariant, reporting the first violation as a
    /// fatal error: volumes sum to the vertex count and match a recount,
    /// perimeters match a boundary-edge recount, the type column is
    /// consistent, and every non-medium cell is connected.
    pub fn verify_invariants(&self) -> Result<(), PottsError> {
        let rows = self.table.rows();
        let vertex_count = self.space.vertex_count();

        let mut volumes = vec![0i64; rows];
        for v in 0..vertex_count {
            let id = self.space.node_id(v);
            if id as usize >= rows {
                return Err(PottsError::InvariantViolation {
                    cell: id,
                    detail: "lattice references a cell id with no table row".into(),
                });
            }
            volumes[id as usize] += 1;
            let expected_type = self.table.type_id(id);
            if self.space.node_type(v) != expected_type {
                return Err(PottsError::InvariantViolation {
                    cell: id,
                    detail: format!(
                        "vertex {v} carries type {} but the cell is type {expected_type}",
                        self.space.node_type(v)
                    ),
                });
            }
        }
        for id in 0..rows as u32 {
            if volumes[id as usize] != self.table.volume(id) {
                return Err(PottsError::InvariantViolation {
                    cell: id,
                    detail: format!(
                        "tabled volume {} but recount {}",
                        self.table.volume(id),
                        volumes[id as usize]
                    ),
                });
            }
        }

        let mut perimeters = vec![0i64; rows];
        for (u, w) in self.space.edges() {
            let id_u = self.space.node_id(u as usize);
            let id_w = self.space.node_id(w as usize);
            if id_u != id_w {
                perimeters[id_u as usize] += 1;
                perimeters[id_w as usize] += 1;
            }
        }
        for id in 0..rows as u32 {
            if perimeters[id as usize] != self.table.perimeter(id) {
                return Err(PottsError::InvariantViolation {
                    cell: id,
                    detail: format!(
                        "tabled perimeter {} but recount {}",
                        self.table.perimeter(id),
                        perimeters[id as usize]
                    ),
                });
            }
        }

        for row in self.table.iter_cells() {
            if row.volume == 0 {
                return Err(PottsError::InvariantViolation {
                    cell: row.id,
                    detail: "cell occupies no vertices".into(),
                });
            }
            let reached = self.connected_volume(row.id);
            if reached != row.volume {
                return Err(PottsError::InvariantViolation {
                    cell: row.id,
                    detail: format!(
                        "cell is fragmented: component of size {reached} out of volume {}",
                        row.volume
                    ),
                });
            }
        }
        Ok(())
    }

    // Size of the connected component containing the cell's first vertex.
    fn connected_volume(&self, cell: u32) -> i64 {
        let vertex_count = self.space.vertex_count();
        let Some(start) = (0..vertex_count).find(|&v| self.space.node_id(v) == cell) else {
            return 0;
        };
        let mut visited = vec![false; vertex_count];
        let mut stack = vec![start];
        visited[start] = true;
        let mut reached = 0i64;
        while let Some(v) = stack.pop() {
            reached += 1;
            for &w in self.space.neighbors(v) {
                let w = w as usize;
                if !visited[w] && self.space.node_id(w) == cell {
                    visited[w] = true;
                    stack.push(w);
                }
            }
        }
        reached
    }
}
