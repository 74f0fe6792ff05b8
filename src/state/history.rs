/// ==============================================================================================
/// ================================ Commit Log & Lattice Replay =================================
/// ==============================================================================================
use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PottsError;

/// Lattice attributes preserved when recording is first enabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Baseline {
    pub node_id: Vec<u32>,
    pub node_type: Vec<u32>,
}

/// Reusable replay target. [`History::replay_into`] overwrites it in place;
/// callers copy the vectors out if they intend to retain a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LatticeSnapshot {
    pub node_id: Vec<u32>,
    pub node_type: Vec<u32>,
    pub time: u64,
}

/// One committed copy, borrowed out of the parallel columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryEntry {
    pub step: u64,
    pub vertex: u32,
    pub new_id: u32,
    pub new_type: u32,
    pub delta_h: i64,
}

/// Append-only log of accepted copies, stored as parallel columns.
///
/// The `step` column is non-decreasing: entries are appended in commit order,
/// and the model-step counter never moves backwards. Replay applies entries
/// with `step <= time` onto the preserved baseline, in log order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
    steps: Vec<u64>,
    vertices: Vec<u32>,
    new_ids: Vec<u32>,
    new_types: Vec<u32>,
    delta_h: Vec<i64>,
    baseline: Option<Baseline>,
}

impl History {
    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[inline]
    pub fn has_baseline(&self) -> bool {
        self.baseline.is_some()
    }

    /// Last recorded model step, if anything was committed while recording.
    #[inline]
    pub fn last_step(&self) -> Option<u64> {
        self.steps.last().copied()
    }

    pub fn entries(&self) -> impl Iterator<Item = HistoryEntry> + '_ {
        (0..self.len()).map(move |i| HistoryEntry {
            step: self.steps[i],
            vertex: self.vertices[i],
            new_id: self.new_ids[i],
            new_type: self.new_types[i],
            delta_h: self.delta_h[i],
        })
    }

    /// Preserve the lattice the log replays from. Only the first call sticks;
    /// toggling recording off and on again keeps extending the same log.
    pub(crate) fn capture_baseline(&mut self, node_id: &[u32], node_type: &[u32]) {
        if self.baseline.is_none() {
            self.baseline = Some(Baseline {
                node_id: node_id.to_vec(),
                node_type: node_type.to_vec(),
            });
        }
    }

    pub(crate) fn record(&mut self, step: u64, vertex: u32, new_id: u32, new_type: u32, dh: i64) {
        debug_assert!(self.steps.last().is_none_or(|&last| last <= step));
        self.steps.push(step);
        self.vertices.push(vertex);
        self.new_ids.push(new_id);
        self.new_types.push(new_type);
        self.delta_h.push(dh);
    }

    /// Reconstruct the lattice as of model step `time` into `out`.
    /// Cost is O(entries with step <= time).
    pub fn replay_into(&self, time: u64, out: &mut LatticeSnapshot) -> Result<(), PottsError> {
        let Some(baseline) = &self.baseline else {
            return Err(PottsError::NothingRecorded);
        };
        out.node_id.clone_from(&baseline.node_id);
        out.node_type.clone_from(&baseline.node_type);
        out.time = time;
        for i in 0..self.len() {
            if self.steps[i] > time {
                break;
            }
            let v = self.vertices[i] as usize;
            out.node_id[v] = self.new_ids[i];
            out.node_type[v] = self.new_types[i];
        }
        Ok(())
    }

    /// Write the log as pretty-printed JSON.
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
}
