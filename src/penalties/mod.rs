/// ==============================================================================================
/// ===================================== Energy Penalty Kit =====================================
/// ==============================================================================================
pub mod adhesion;
pub mod chemotaxis;
pub mod migration;
pub mod perimeter;
pub mod volume;

pub use adhesion::AdhesionPenalty;
pub use chemotaxis::ChemotaxisPenalty;
pub use migration::MigrationPenalty;
pub use perimeter::PerimeterPenalty;
pub use volume::VolumePenalty;

use crate::engine::StepInfo;
use crate::error::PottsError;
use crate::space::CellSpace;
use crate::state::CellTable;

/// One additive term of the Hamiltonian.
///
/// A fixed enum keeps dispatch on the attempt path branch-predictable and
/// heap-free. Every variant prices a candidate copy through `delta_h`; the
/// commit and tick hooks let terms with auxiliary state (the Act model's
/// vertex memory) stay current.
#[derive(Debug, Clone)]
pub enum Penalty {
    Adhesion(AdhesionPenalty),
    Volume(VolumePenalty),
    Perimeter(PerimeterPenalty),
    Migration(MigrationPenalty),
    Chemotaxis(ChemotaxisPenalty),
}

impl Penalty {
    /// Energy change of the candidate copy described by `info`.
    /// Total: never panics, never blocks the attempt path.
    #[inline]
    pub fn delta_h(&self, space: &CellSpace, table: &CellTable, info: &StepInfo) -> i64 {
        match self {
            Penalty::Adhesion(p) => p.delta_h(space, info),
            Penalty::Volume(p) => p.delta_h(table, info),
            Penalty::Perimeter(p) => p.delta_h(table, info),
            Penalty::Migration(p) => p.delta_h(space, info),
            Penalty::Chemotaxis(p) => p.delta_h(space, info),
        }
    }

    /// Auxiliary-state update after an accepted copy.
    #[inline]
    pub fn on_commit(&mut self, info: &StepInfo) {
        if let Penalty::Migration(p) = self {
            p.on_commit(info);
        }
    }

    /// Per-model-step callback, run strictly after all attempts of the step.
    #[inline]
    pub fn on_tick(&mut self) {
        if let Penalty::Migration(p) = self {
            p.on_tick();
        }
    }

    /// Eager consistency check against the lattice and table this penalty
    /// will run on. Called once at simulation construction.
    pub(crate) fn validate(&self, space: &CellSpace, table: &CellTable) -> Result<(), PottsError> {
        match self {
            Penalty::Adhesion(p) => p.validate(table),
            Penalty::Volume(p) => p.validate(table),
            Penalty::Perimeter(p) => p.validate(table),
            Penalty::Migration(p) => p.validate(space, table),
            Penalty::Chemotaxis(p) => p.validate(space, table),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Penalty::Adhesion(_) => "adhesion",
            Penalty::Volume(_) => "volume",
            Penalty::Perimeter(_) => "perimeter",
            Penalty::Migration(_) => "migration",
            Penalty::Chemotaxis(_) => "chemotaxis",
        }
    }
}

/// User parameter vectors are indexed from 1 (type 1 is the first real cell
/// type); internally slot 0 is the medium and contributes nothing.
pub(crate) fn shift_from_one(lambdas: &[i64]) -> Vec<i64> {
    let mut shifted = Vec::with_capacity(lambdas.len() + 1);
    shifted.push(0);
    shifted.extend_from_slice(lambdas);
    shifted
}

/// Change of `lambda * (x - x*)^2` when `x` moves by `delta`, saturating at
/// the i64 range instead of crashing on absurd targets.
#[inline]
pub(crate) fn quadratic_shift(lambda: i64, current: i64, desired: i64, delta: i64) -> i64 {
    let before = current.saturating_sub(desired);
    let after = before.saturating_add(delta);
    lambda.saturating_mul(
        after
            .saturating_mul(after)
            .saturating_sub(before.saturating_mul(before)),
    )
}
