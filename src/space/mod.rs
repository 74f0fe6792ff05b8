pub mod cell_space;
pub mod connectivity;

pub use cell_space::{CellSpace, Neighborhood, Periodicity, MAX_DIMS};
pub use connectivity::ConnectivityGuard;
