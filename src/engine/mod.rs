/// ==============================================================================================
/// ================================== Metropolis-Hastings Core ==================================
/// ==============================================================================================
pub mod cell_potts;
pub mod metropolis;
pub mod placement;

pub use cell_potts::{CellPotts, DEFAULT_TEMPERATURE};

use serde::{Deserialize, Serialize};

use crate::space::CellSpace;

/// Scratch describing one copy attempt: replace `node_id[target]` with
/// `node_id[source]` for a source adjacent to the target.
///
/// `perim_delta_*` are the net boundary-edge changes the copy would cause for
/// the source and target cells; the engine computes them once per attempt and
/// both the perimeter term and the commit path consume them.
#[derive(Debug, Clone, Copy, Default)]
pub struct StepInfo {
    pub step: u64,
    pub source: usize,
    pub target: usize,
    pub source_id: u32,
    pub target_id: u32,
    pub source_type: u32,
    pub target_type: u32,
    pub perim_delta_source: i64,
    pub perim_delta_target: i64,
    pub success: bool,
}

impl StepInfo {
    /// Describe the candidate copy `source -> target` on the current lattice.
    pub fn for_copy(space: &CellSpace, source: usize, target: usize, step: u64) -> Self {
        let source_id = space.node_id(source);
        let target_id = space.node_id(target);

        let mut same_source = 0i64;
        let mut same_target = 0i64;
        let neighbors = space.neighbors(target);
        for &u in neighbors {
            let uid = space.node_id(u as usize);
            if uid == source_id {
                same_source += 1;
            }
            if uid == target_id {
                same_target += 1;
            }
        }
        let degree = neighbors.len() as i64;

        Self {
            step,
            source,
            target,
            source_id,
            target_id,
            source_type: space.node_type(source),
            target_type: space.node_type(target),
            // The target vertex joins the source cell: its edges to foreign
            // vertices become boundary, its edges into the source cell stop
            // being boundary. Mirror argument for the cell it leaves.
            perim_delta_source: degree - 2 * same_source,
            perim_delta_target: 2 * same_target - degree,
            success: false,
        }
    }
}

/// Attempt outcome counters for one simulation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StepStats {
    pub attempts: u64,
    pub committed: u64,
    pub rejected_identity: u64,
    pub rejected_last_vertex: u64,
    pub rejected_connectivity: u64,
    pub rejected_energy: u64,
}
