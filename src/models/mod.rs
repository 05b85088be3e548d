pub mod cell;
pub mod seat;

pub use cell::{Cell, CellKind, CellStatus, Position, Seat, SeatKind};
pub use seat::{FlatSeat, RoomId, SeatId, SeatStatus, SeatTypeName};
