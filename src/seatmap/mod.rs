pub mod convert;
pub mod grid;
pub mod labels;
pub mod linking;
pub mod selection;
pub mod session;
pub mod sync;
pub mod tools;

pub use convert::{from_flat_seats, from_flat_seats_with, to_flat_seats, HydratedSeatMap, LinkFallback};
pub use grid::{build_empty_grid, LinkViolation, SeatMap};
pub use labels::LabelConvention;
pub use linking::{create_double, retype_cell, unlink, Retype};
pub use selection::{check_grid_selection, check_selection, Occupancy};
pub use session::EditSession;
pub use sync::{plan_sync, SyncPlan};
pub use tools::{apply_tool, BatchReport, CellFailure, Target, Tool};
