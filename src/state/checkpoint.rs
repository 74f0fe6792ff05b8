/// ==============================================================================================
/// ================================ Self-Describing Checkpoint ==================================
/// ==============================================================================================
use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PottsError;
use crate::space::Neighborhood;
use crate::state::{CellTable, History};

/// Everything needed to rebuild a simulation in another process: the lattice
/// descriptor, the full cell table, and the commit log with its baseline.
/// Penalties are not persisted; the caller re-supplies them on restore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    pub shape: Vec<usize>,
    pub periodic: Vec<bool>,
    pub neighborhood: Neighborhood,
    pub temperature: f64,
    pub step: u64,
    pub node_id: Vec<u32>,
    pub node_type: Vec<u32>,
    pub table: CellTable,
    pub history: History,
}

impl Checkpoint {
    pub fn save(&self, path: &Path) -> Result<(), PottsError> {
        let io_err = |source: std::io::Error| PottsError::CheckpointIo {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| {
            PottsError::CheckpointCodec {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let mut file = File::create(path).map_err(io_err)?;
        file.write_all(json.as_bytes()).map_err(io_err)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, PottsError> {
        let file = File::open(path).map_err(|source| PottsError::CheckpointIo {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_reader(file).map_err(|source| PottsError::CheckpointCodec {
            path: path.to_path_buf(),
            source,
        })
    }
}
