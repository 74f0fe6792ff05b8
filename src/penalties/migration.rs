use super::shift_from_one;
use crate::engine::StepInfo;
use crate::error::PottsError;
use crate::space::CellSpace;
use crate::state::{CellTable, MEDIUM};

/// Act-model migration term.
///
/// Every vertex carries a memory value in `[0, max_act]`. An accepted copy
/// stamps the target vertex with `max_act`; each model-step tick decrements
/// all positive memories by one. Recently active lattice regions therefore
/// prefer to keep extending, which turns the random walk into directed
/// motion.
#[derive(Debug, Clone)]
pub struct MigrationPenalty {
    max_act: u32,
    lambdas: Vec<i64>,      // slot 0 = medium
    shape: Vec<usize>,
    node_memory: Vec<u32>,  // activity countdown per vertex
}

impl MigrationPenalty {
    /// `lambdas` holds one strength per cell type, indexed from type 1;
    /// `shape` must match the lattice this penalty is attached to.
    pub fn new(max_act: u32, lambdas: &[i64], shape: &[usize]) -> Result<Self, PottsError> {
        if max_act == 0 {
            return Err(PottsError::ZeroMaxAct);
        }
        let vertices: usize = shape.iter().product();
        Ok(Self {
            max_act,
            lambdas: shift_from_one(lambdas),
            shape: shape.to_vec(),
            node_memory: vec![0; vertices],
        })
    }

    #[inline]
    pub fn max_act(&self) -> u32 {
        self.max_act
    }

    /// Activity countdown values, for observers and renderers.
    #[inline]
    pub fn node_memory(&self) -> &[u32] {
        &self.node_memory
    }

    // Geometric mean of the memory over the members of `cell` among `center`
    // and its neighbors. Medium membership contributes nothing: a medium
    // `cell` and an empty member set both give 0, as does any zero-memory
    // member (zero factor in the product).
    fn geometric_mean(&self, space: &CellSpace, center: usize, cell: u32) -> f64 {
        if cell == MEDIUM {
            return 0.0;
        }
        let mut ln_sum = 0.0f64;
        let mut members = 0u32;
        let mut last = 0u32;
        let mut visit = |v: usize| -> bool {
            if space.node_id(v) != cell {
                return true;
            }
            let memory = self.node_memory[v];
            if memory == 0 {
                return false;
            }
            ln_sum += f64::from(memory).ln();
            members += 1;
            last = memory;
            true
        };
        if !visit(center) {
            return 0.0;
        }
        for &u in space.neighbors(center) {
            if !visit(u as usize) {
                return 0.0;
            }
        }
        match members {
            0 => 0.0,
            1 => f64::from(last), // exact, no ln/exp round trip
            _ => (ln_sum / f64::from(members)).exp(),
        }
    }

    pub(crate) fn delta_h(&self, space: &CellSpace, info: &StepInfo) -> i64 {
        let gm_forward = self.geometric_mean(space, info.target, info.source_id);
        let gm_reverse = self.geometric_mean(space, info.source, info.target_id);
        let lambda_s = self.lambdas[info.source_type as usize] as f64;
        let lambda_t = self.lambdas[info.target_type as usize] as f64;
        // Scaled by max_act in the numerator, rounded toward zero.
        ((-lambda_s * gm_forward + lambda_t * gm_reverse) / f64::from(self.max_act)) as i64
    }

    pub(crate) fn on_commit(&mut self, info: &StepInfo) {
        self.node_memory[info.target] = self.max_act;
    }

    pub(crate) fn on_tick(&mut self) {
        for memory in &mut self.node_memory {
            *memory = memory.saturating_sub(1);
        }
    }

    pub(crate) fn validate(&self, space: &CellSpace, table: &CellTable) -> Result<(), PottsError> {
        if self.shape != space.shape() {
            return Err(PottsError::ShapeMismatch {
                what: "migration memory",
                got: self.shape.clone(),
                expected: space.shape().to_vec(),
            });
        }
        let expected = table.type_count() + 1;
        if self.lambdas.len() != expected {
            return Err(PottsError::TypeCountMismatch {
                penalty: "migration",
                got: self.lambdas.len(),
                expected,
            });
        }
        Ok(())
    }
}
