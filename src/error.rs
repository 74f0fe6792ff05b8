use std::path::PathBuf;

/// Coarse classification of [`PottsError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected at construction: inconsistent shapes, sizes, or parameters.
    Configuration,
    /// Initial cells cannot be placed on the lattice.
    Placement,
    /// An internal consistency check failed. Fatal, never recovered.
    Invariant,
    /// A query or mutation that is not legal in the current state.
    InvalidOperation,
}

/// Errors produced by constructors, queries, and consistency checks.
///
/// The per-attempt path never returns an error: identity, connectivity, and
/// energy rejections are ordinary outcomes reported through the step scratch.
#[derive(Debug, thiserror::Error)]
pub enum PottsError {
    #[error("lattice shape must have 1..={max} positive extents (got {shape:?})")]
    BadShape { shape: Vec<usize>, max: usize },

    #[error("lattice has {vertices} vertices, more than the supported {max}")]
    LatticeTooLarge { vertices: u128, max: u64 },

    #[error("per-axis periodicity has {got} entries, lattice has {expected} axes")]
    PeriodicityArity { got: usize, expected: usize },

    #[error("adhesion matrix is not symmetric at ({row}, {col})")]
    AsymmetricAdhesion { row: usize, col: usize },

    #[error("{penalty} parameters cover {got} cell types, table declares {expected}")]
    TypeCountMismatch {
        penalty: &'static str,
        got: usize,
        expected: usize,
    },

    #[error("{what} shape {got:?} does not match lattice shape {expected:?}")]
    ShapeMismatch {
        what: &'static str,
        got: Vec<usize>,
        expected: Vec<usize>,
    },

    #[error("max_act must be positive")]
    ZeroMaxAct,

    #[error("cell groups are inconsistent: {got} {what} entries for {expected} groups")]
    GroupArity {
        what: &'static str,
        got: usize,
        expected: usize,
    },

    #[error("initial cells need {needed} vertices, lattice holds {capacity}")]
    InsufficientCapacity { needed: i64, capacity: usize },

    #[error("seed position {position:?} lies outside the lattice")]
    SeedOutOfRange { position: Vec<f64> },

    #[error("invariant violated for cell {cell}: {detail}")]
    InvariantViolation { cell: u32, detail: String },

    #[error("cell {cell} still occupies {volume} vertices; only empty cells can be removed")]
    RemoveNonEmpty { cell: u32, volume: i64 },

    #[error("cells cannot be removed while recording; ids above {cell} would shift under the log")]
    RemoveWhileRecording { cell: u32 },

    #[error("no such cell id {cell}")]
    NoSuchCell { cell: u32 },

    #[error("no such column {column:?}")]
    NoSuchColumn { column: String },

    #[error("column {column:?} is derived and cannot be set directly")]
    ReadOnlyColumn { column: String },

    #[error("replay time must be non-negative (got {time})")]
    NegativeTime { time: i64 },

    #[error("nothing recorded; enable recording before querying the history")]
    NothingRecorded,

    #[error("checkpoint io at {}: {source}", path.display())]
    CheckpointIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("checkpoint encode/decode at {}: {source}", path.display())]
    CheckpointCodec {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl PottsError {
    pub fn kind(&self) -> ErrorKind {
        use PottsError::*;
        match self {
            BadShape { .. }
            | LatticeTooLarge { .. }
            | PeriodicityArity { .. }
            | AsymmetricAdhesion { .. }
            | TypeCountMismatch { .. }
            | ShapeMismatch { .. }
            | ZeroMaxAct
            | GroupArity { .. } => ErrorKind::Configuration,
            InsufficientCapacity { .. } | SeedOutOfRange { .. } => ErrorKind::Placement,
            InvariantViolation { .. } => ErrorKind::Invariant,
            RemoveNonEmpty { .. }
            | RemoveWhileRecording { .. }
            | NoSuchCell { .. }
            | NoSuchColumn { .. }
            | ReadOnlyColumn { .. }
            | NegativeTime { .. }
            | NothingRecorded
            | CheckpointIo { .. }
            | CheckpointCodec { .. } => ErrorKind::InvalidOperation,
        }
    }
}
