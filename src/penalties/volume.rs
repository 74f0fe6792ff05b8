use super::{quadratic_shift, shift_from_one};
use crate::engine::StepInfo;
use crate::error::PottsError;
use crate::state::{CellTable, MEDIUM};

/// Volume-constraint term: `lambda_type * (V - V*)^2` per cell.
///
/// A candidate copy grows the source cell by one vertex and shrinks the
/// target cell by one; only those two squared deviations move. The medium is
/// exempt on both sides.
#[derive(Debug, Clone)]
pub struct VolumePenalty {
    lambdas: Vec<i64>, // slot 0 = medium
}

impl VolumePenalty {
    /// `lambdas` holds one stiffness per cell type, indexed from type 1.
    pub fn new(lambdas: &[i64]) -> Self {
        Self {
            lambdas: shift_from_one(lambdas),
        }
    }

    pub(crate) fn delta_h(&self, table: &CellTable, info: &StepInfo) -> i64 {
        let mut dh = 0i64;
        if info.source_id != MEDIUM {
            dh = dh.saturating_add(quadratic_shift(
                self.lambdas[info.source_type as usize],
                table.volume(info.source_id),
                table.desired_volume(info.source_id),
                1,
            ));
        }
        if info.target_id != MEDIUM {
            dh = dh.saturating_add(quadratic_shift(
                self.lambdas[info.target_type as usize],
                table.volume(info.target_id),
                table.desired_volume(info.target_id),
                -1,
            ));
        }
        dh
    }

    pub(crate) fn validate(&self, table: &CellTable) -> Result<(), PottsError> {
        let expected = table.type_count() + 1;
        if self.lambdas.len() != expected {
            return Err(PottsError::TypeCountMismatch {
                penalty: "volume",
                got: self.lambdas.len(),
                expected,
            });
        }
        Ok(())
    }
}
