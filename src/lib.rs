//! Cellular Potts Model engine.
//!
//! Cells are maximally connected same-id regions of an N-dimensional grid.
//! The grid is a precomputed CSR graph ([`space::CellSpace`]); per-cell state
//! lives in a column-oriented table ([`state::CellTable`]); the Hamiltonian is
//! a sum of integer penalty terms ([`penalties::Penalty`]); and the engine
//! ([`engine::CellPotts`]) evolves the lattice by Metropolis-Hastings copy
//! attempts with incremental energy bookkeeping, a local connectivity guard,
//! and an optional replayable commit log.
//!
//! ```no_run
//! use cellular_potts_rs::{
//!     CellPotts, CellSpace, CellState, Neighborhood, Penalty, VolumePenalty,
//! };
//!
//! let space = CellSpace::new(&[50, 50], true, Neighborhood::Moore)?;
//! let state = CellState::new(&["Epithelial"], &[500], &[1])?;
//! let mut sim = CellPotts::seeded(
//!     space,
//!     state,
//!     vec![Penalty::Volume(VolumePenalty::new(&[5]))],
//!     42,
//! )?;
//! sim.run(1000);
//! # Ok::<(), cellular_potts_rs::PottsError>(())
//! ```

pub mod engine;
pub mod error;
pub mod examples;
pub mod penalties;
pub mod space;
pub mod state;
pub mod tasks;

#[cfg(test)]
mod tests;

pub use engine::{CellPotts, StepInfo, StepStats};
pub use error::{ErrorKind, PottsError};
pub use penalties::{
    AdhesionPenalty, ChemotaxisPenalty, MigrationPenalty, Penalty, PerimeterPenalty, VolumePenalty,
};
pub use space::{CellSpace, ConnectivityGuard, Neighborhood, Periodicity};
pub use state::{CellRecord, CellState, CellTable, Checkpoint, History, LatticeSnapshot, MEDIUM};
