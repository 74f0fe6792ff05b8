use std::sync::{Arc, RwLock};

use ndarray::ArrayD;

use crate::engine::StepInfo;
use crate::error::PottsError;
use crate::space::{CellSpace, MAX_DIMS};
use crate::state::{CellTable, MEDIUM};

/// Chemotaxis term over an external species field.
///
/// The field is an N-d real array aligned with the lattice, owned by an
/// outside collaborator (a reaction-diffusion solver, typically) that may
/// rewrite it between steps; sharing across threads must be guarded, hence
/// the lock. Positive `lambda` makes uphill extensions energetically
/// favorable, negative drives cells downhill.
#[derive(Debug, Clone)]
pub struct ChemotaxisPenalty {
    lambdas: Vec<f64>, // slot 0 = medium
    field: Arc<RwLock<ArrayD<f64>>>,
}

impl ChemotaxisPenalty {
    /// `lambdas` holds one strength per cell type, indexed from type 1.
    pub fn new(lambdas: &[f64], field: Arc<RwLock<ArrayD<f64>>>) -> Self {
        let mut shifted = Vec::with_capacity(lambdas.len() + 1);
        shifted.push(0.0);
        shifted.extend_from_slice(lambdas);
        Self {
            lambdas: shifted,
            field,
        }
    }

    /// Handle to the shared species field.
    pub fn field(&self) -> Arc<RwLock<ArrayD<f64>>> {
        Arc::clone(&self.field)
    }

    pub(crate) fn delta_h(&self, space: &CellSpace, info: &StepInfo) -> i64 {
        // Retractions into the medium carry no chemotactic term.
        if info.source_id == MEDIUM {
            return 0;
        }
        let lambda = self.lambdas[info.source_type as usize];
        if lambda == 0.0 {
            return 0;
        }
        let field = self.field.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        let ndim = space.ndim();
        let mut coords = [0usize; MAX_DIMS];
        space.coords_into(info.target, &mut coords);
        let at_target = field.get(&coords[..ndim]).copied().unwrap_or(0.0);
        space.coords_into(info.source, &mut coords);
        let at_source = field.get(&coords[..ndim]).copied().unwrap_or(0.0);
        // Uphill copies lower the energy when lambda is positive.
        (-lambda * (at_target - at_source)) as i64
    }

    pub(crate) fn validate(&self, space: &CellSpace, table: &CellTable) -> Result<(), PottsError> {
        let field = self.field.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        if field.shape() != space.shape() {
            return Err(PottsError::ShapeMismatch {
                what: "chemotaxis field",
                got: field.shape().to_vec(),
                expected: space.shape().to_vec(),
            });
        }
        let expected = table.type_count() + 1;
        if self.lambdas.len() != expected {
            return Err(PottsError::TypeCountMismatch {
                penalty: "chemotaxis",
                got: self.lambdas.len(),
                expected,
            });
        }
        Ok(())
    }
}
