use crate::models::SeatId;
use crate::seatmap::labels::LabelConvention;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Координата клетки: индексы ряда и колонки, с нуля.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeatKind {
    Standard,
    Vip,
    DoublePrimary,
    DoubleSecondary,
}

impl SeatKind {
    pub fn is_double(self) -> bool {
        matches!(self, SeatKind::DoublePrimary | SeatKind::DoubleSecondary)
    }
}

/// Статус места в сетке. `Taken`/`Selected` приходят от бронирования
/// и в плоский список не сохраняются.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CellStatus {
    #[default]
    Available,
    Taken,
    Selected,
    Maintenance,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    #[serde(rename = "seatKind")]
    pub kind: SeatKind,
    pub label: String,
    #[serde(default)]
    pub status: CellStatus,
    /// Клетка-партнёр двойного места.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked: Option<Position>,
}

impl Seat {
    /// Основная половина двойного места рисуется на две колонки.
    pub fn spans_columns(&self) -> usize {
        if self.kind == SeatKind::DoublePrimary {
            2
        } else {
            1
        }
    }
}

/// Содержимое клетки. Поля места есть только у варианта `Seat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum CellKind {
    Empty,
    Seat(Seat),
    Aisle,
    Blocked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub position: Position,
    pub display_row: String,
    pub display_column: String,
    /// Идентификатор записи в базе, если клетка из неё загружена.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<SeatId>,
    #[serde(flatten)]
    pub content: CellKind,
}

impl Cell {
    fn with_content(position: Position, convention: LabelConvention, content: CellKind) -> Self {
        Cell {
            position,
            display_row: convention.row_label(position.row),
            display_column: convention.column_label(position.column),
            record_id: None,
            content,
        }
    }

    pub fn empty(position: Position, convention: LabelConvention) -> Self {
        Self::with_content(position, convention, CellKind::Empty)
    }

    pub fn aisle(position: Position, convention: LabelConvention) -> Self {
        Self::with_content(position, convention, CellKind::Aisle)
    }

    pub fn blocked(position: Position, convention: LabelConvention) -> Self {
        Self::with_content(position, convention, CellKind::Blocked)
    }

    /// Место без связи. Подпись всегда выводится из координаты.
    pub fn seat(
        position: Position,
        convention: LabelConvention,
        kind: SeatKind,
        status: CellStatus,
    ) -> Self {
        let seat = Seat {
            kind,
            label: convention.seat_label(position),
            status,
            linked: None,
        };
        Self::with_content(position, convention, CellKind::Seat(seat))
    }

    pub fn with_record_id(mut self, record_id: Option<SeatId>) -> Self {
        self.record_id = record_id;
        self
    }

    pub fn linked_to(mut self, partner: Position) -> Self {
        if let CellKind::Seat(seat) = &mut self.content {
            seat.linked = Some(partner);
        }
        self
    }

    pub fn as_seat(&self) -> Option<&Seat> {
        match &self.content {
            CellKind::Seat(seat) => Some(seat),
            _ => None,
        }
    }

    pub fn as_seat_mut(&mut self) -> Option<&mut Seat> {
        match &mut self.content {
            CellKind::Seat(seat) => Some(seat),
            _ => None,
        }
    }

    pub fn seat_kind(&self) -> Option<SeatKind> {
        self.as_seat().map(|seat| seat.kind)
    }

    pub fn is_double(&self) -> bool {
        self.seat_kind().is_some_and(SeatKind::is_double)
    }

    /// Проход или заблокированная клетка.
    pub fn is_obstacle(&self) -> bool {
        matches!(self.content, CellKind::Aisle | CellKind::Blocked)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.content, CellKind::Empty)
    }

    pub fn status(&self) -> Option<CellStatus> {
        self.as_seat().map(|seat| seat.status)
    }
}
