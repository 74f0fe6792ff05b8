pub mod cell_table;
pub mod checkpoint;
pub mod history;

pub use cell_table::{CellRecord, CellRow, CellState, CellTable, MEDIUM, MEDIUM_DESIRED_VOLUME};
pub use checkpoint::Checkpoint;
pub use history::{Baseline, History, HistoryEntry, LatticeSnapshot};
