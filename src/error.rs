//! error.rs
//!
//! Единая таксономия ошибок ядра схемы зала.
//!
//! Все варианты описывают ожидаемые, восстановимые ситуации: вызывающий код
//! получает код ошибки и координату/идентификатор, из-за которых она возникла.
//! Ядро никогда не меняет сетку до того, как вернёт одну из этих ошибок.

use crate::models::{Position, SeatId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SeatMapError>;

/// Почему не удалось подобрать пару для двойного места.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartnerProblem {
    /// Соседняя клетка за пределами сетки.
    OutOfRange,
    /// Соседняя клетка - проход или заблокирована.
    Unavailable,
    /// Соседнее место уже входит в другую пару.
    AlreadyPaired,
}

impl PartnerProblem {
    pub fn describe(self) -> &'static str {
        match self {
            PartnerProblem::OutOfRange => "adjacent seat is outside the room",
            PartnerProblem::Unavailable => "adjacent seat unavailable",
            PartnerProblem::AlreadyPaired => "adjacent seat already paired",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeatMapError {
    #[error("invalid seat map dimensions {width}x{height}")]
    InvalidDimension { width: usize, height: usize },

    #[error("seat {seat_id} has malformed label row={row:?} column={column:?}")]
    MalformedSeatLabel {
        seat_id: SeatId,
        row: String,
        column: String,
    },

    #[error("cannot create double seat at position {position}: {}", .reason.describe())]
    NoEligiblePartner {
        position: Position,
        reason: PartnerProblem,
    },

    #[error("selecting seat {seat} would leave unreachable single seats: {}", .orphans.join(", "))]
    WouldCreateOrphanGap { seat: String, orphans: Vec<String> },

    #[error("position {position} is outside the {width}x{height} seat map")]
    OutOfRange {
        position: Position,
        width: usize,
        height: usize,
    },
}

impl SeatMapError {
    /// Стабильный машинный код для UI.
    pub fn code(&self) -> &'static str {
        match self {
            SeatMapError::InvalidDimension { .. } => "invalid_dimension",
            SeatMapError::MalformedSeatLabel { .. } => "malformed_seat_label",
            SeatMapError::NoEligiblePartner { .. } => "no_eligible_partner",
            SeatMapError::WouldCreateOrphanGap { .. } => "would_create_orphan_gap",
            SeatMapError::OutOfRange { .. } => "out_of_range",
        }
    }

    /// Текст для пользователя. Отказ из-за одиночного места намеренно
    /// отличается от общего "место недоступно": лечится выбором другого места.
    pub fn user_message(&self) -> String {
        match self {
            SeatMapError::InvalidDimension { .. } => {
                "The room must have at least one row and one column.".to_string()
            }
            SeatMapError::MalformedSeatLabel { seat_id, .. } => {
                format!("Seat {} has an unreadable row or column label.", seat_id)
            }
            SeatMapError::NoEligiblePartner { position, reason } => format!(
                "Cannot create a double seat at {}: {}.",
                position,
                reason.describe()
            ),
            SeatMapError::WouldCreateOrphanGap { .. } => {
                "Selecting this seat would leave an unreachable single seat in this row. Please pick a different seat.".to_string()
            }
            SeatMapError::OutOfRange { position, .. } => {
                format!("Position {} is outside the room layout.", position)
            }
        }
    }

    /// Ошибка валидного запроса, отклонённого правилом (а не кривыми данными).
    pub fn is_rule_rejection(&self) -> bool {
        matches!(
            self,
            SeatMapError::NoEligiblePartner { .. } | SeatMapError::WouldCreateOrphanGap { .. }
        )
    }
}
