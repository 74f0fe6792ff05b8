use crate::engine::StepInfo;
use crate::error::PottsError;
use crate::space::CellSpace;
use crate::state::CellTable;

/// Contact-energy term.
///
/// `J` is a symmetric matrix of contact energies indexed by cell type, with
/// row and column 0 for the medium. Every boundary edge between vertices of
/// different cells pays the contact energy of their two types; the delta for
/// a candidate copy only involves the edges incident to the target vertex.
#[derive(Debug, Clone)]
pub struct AdhesionPenalty {
    j: Vec<i64>, // (types + 1)^2, row-major
    dim: usize,
}

impl AdhesionPenalty {
    /// Construction rejects a non-square or non-symmetric matrix.
    pub fn new(j: &[Vec<i64>]) -> Result<Self, PottsError> {
        let dim = j.len();
        for (row, entries) in j.iter().enumerate() {
            if entries.len() != dim {
                return Err(PottsError::AsymmetricAdhesion {
                    row,
                    col: entries.len().min(dim),
                });
            }
            for col in 0..dim {
                if j[row][col] != j[col][row] {
                    return Err(PottsError::AsymmetricAdhesion { row, col });
                }
            }
        }
        let flat = j.iter().flat_map(|row| row.iter().copied()).collect();
        Ok(Self { j: flat, dim })
    }

    #[inline]
    fn contact(&self, a: u32, b: u32) -> i64 {
        self.j[a as usize * self.dim + b as usize]
    }

    pub(crate) fn delta_h(&self, space: &CellSpace, info: &StepInfo) -> i64 {
        let mut dh = 0i64;
        for &u in space.neighbors(info.target) {
            let u = u as usize;
            let uid = space.node_id(u);
            let uty = space.node_type(u);
            if uid != info.source_id {
                dh = dh.saturating_add(self.contact(info.source_type, uty));
            }
            if uid != info.target_id {
                dh = dh.saturating_sub(self.contact(info.target_type, uty));
            }
        }
        dh
    }

    pub(crate) fn validate(&self, table: &CellTable) -> Result<(), PottsError> {
        let expected = table.type_count() + 1;
        if self.dim != expected {
            return Err(PottsError::TypeCountMismatch {
                penalty: "adhesion",
                got: self.dim,
                expected,
            });
        }
        Ok(())
    }
}
