//! Агрегат схемы зала.
//!
//! Сетка `height x width`, ровно одна клетка на каждую координату.
//! Связи двойных мест хранятся как координаты партнёра, а не ссылки,
//! поэтому клетки можно заменять целиком без висящих указателей.

use crate::error::{Result, SeatMapError};
use crate::models::{Cell, Position, RoomId, SeatKind};
use crate::seatmap::labels::LabelConvention;
use serde::{Deserialize, Serialize};

/// Верхняя граница размеров зала в любую сторону.
pub const MAX_DIMENSION: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawSeatMap")]
pub struct SeatMap {
    width: usize,
    height: usize,
    room_id: RoomId,
    room_name: String,
    convention: LabelConvention,
    cells: Vec<Vec<Cell>>,
}

// Схема в том виде, в котором её присылает клиент, до проверки формы
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSeatMap {
    width: usize,
    height: usize,
    room_id: RoomId,
    #[serde(default)]
    room_name: String,
    #[serde(default)]
    convention: LabelConvention,
    cells: Vec<Vec<Cell>>,
}

impl TryFrom<RawSeatMap> for SeatMap {
    type Error = SeatMapError;

    fn try_from(raw: RawSeatMap) -> Result<Self> {
        check_dimensions(raw.width, raw.height)?;
        if raw.cells.len() != raw.height || raw.cells.iter().any(|row| row.len() != raw.width) {
            return Err(SeatMapError::InvalidDimension {
                width: raw.width,
                height: raw.height,
            });
        }
        for (r, row) in raw.cells.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if cell.position != Position::new(r, c) {
                    return Err(SeatMapError::OutOfRange {
                        position: cell.position,
                        width: raw.width,
                        height: raw.height,
                    });
                }
            }
        }
        Ok(SeatMap {
            width: raw.width,
            height: raw.height,
            room_id: raw.room_id,
            room_name: raw.room_name,
            convention: raw.convention,
            cells: raw.cells,
        })
    }
}

fn check_dimensions(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(SeatMapError::InvalidDimension { width, height });
    }
    Ok(())
}

/// Нарушение согласованности пары двойного места.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkViolation {
    pub position: Position,
    pub reason: &'static str,
}

/// Пустая сетка с каноническим соглашением о подписях.
pub fn build_empty_grid(
    width: usize,
    height: usize,
    room_id: RoomId,
    room_name: impl Into<String>,
) -> Result<SeatMap> {
    SeatMap::empty(width, height, room_id, room_name, LabelConvention::default())
}

impl SeatMap {
    pub fn empty(
        width: usize,
        height: usize,
        room_id: RoomId,
        room_name: impl Into<String>,
        convention: LabelConvention,
    ) -> Result<Self> {
        check_dimensions(width, height)?;
        let cells = (0..height)
            .map(|r| {
                (0..width)
                    .map(|c| Cell::empty(Position::new(r, c), convention))
                    .collect()
            })
            .collect();
        Ok(SeatMap {
            width,
            height,
            room_id,
            room_name: room_name.into(),
            convention,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    pub fn room_name(&self) -> &str {
        &self.room_name
    }

    pub fn set_room_name(&mut self, name: impl Into<String>) {
        self.room_name = name.into();
    }

    pub fn convention(&self) -> LabelConvention {
        self.convention
    }

    pub fn contains(&self, position: Position) -> bool {
        position.row < self.height && position.column < self.width
    }

    pub fn get(&self, position: Position) -> Option<&Cell> {
        self.cells.get(position.row)?.get(position.column)
    }

    pub fn get_mut(&mut self, position: Position) -> Option<&mut Cell> {
        self.cells.get_mut(position.row)?.get_mut(position.column)
    }

    /// Как `get`, но с ошибкой `OutOfRange`.
    pub fn cell(&self, position: Position) -> Result<&Cell> {
        self.get(position).ok_or(self.out_of_range(position))
    }

    pub fn cell_mut(&mut self, position: Position) -> Result<&mut Cell> {
        let err = self.out_of_range(position);
        self.get_mut(position).ok_or(err)
    }

    /// Заменяет клетку по её собственной координате.
    pub fn set(&mut self, cell: Cell) -> Result<()> {
        let slot = self.cell_mut(cell.position)?;
        *slot = cell;
        Ok(())
    }

    pub fn out_of_range(&self, position: Position) -> SeatMapError {
        SeatMapError::OutOfRange {
            position,
            width: self.width,
            height: self.height,
        }
    }

    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        self.cells.get(row).map(Vec::as_slice)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.iter().map(Vec::as_slice)
    }

    /// Все клетки построчно.
    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().flatten()
    }

    pub fn seat_count(&self) -> usize {
        self.iter().filter(|cell| cell.as_seat().is_some()).count()
    }

    /// Все односторонние и несогласованные связи двойных мест.
    pub fn link_violations(&self) -> Vec<LinkViolation> {
        let mut violations = Vec::new();
        for cell in self.iter() {
            let Some(seat) = cell.as_seat() else {
                continue;
            };
            let here = cell.position;
            let reason = match (seat.kind, seat.linked) {
                (SeatKind::Standard | SeatKind::Vip, Some(_)) => Some("single seat carries a link"),
                (SeatKind::Standard | SeatKind::Vip, None) => None,
                (_, None) => Some("double seat without partner"),
                (kind, Some(partner)) => {
                    let expected_column = match kind {
                        SeatKind::DoublePrimary => here.column.checked_add(1),
                        _ => here.column.checked_sub(1),
                    };
                    let expected_kind = match kind {
                        SeatKind::DoublePrimary => SeatKind::DoubleSecondary,
                        _ => SeatKind::DoublePrimary,
                    };
                    match self.get(partner).and_then(Cell::as_seat) {
                        _ if partner.row != here.row || Some(partner.column) != expected_column => {
                            Some("partner is not the adjacent cell")
                        }
                        None => Some("partner cell is not a seat"),
                        Some(other) if other.kind != expected_kind => Some("partner has wrong seat kind"),
                        Some(other) if other.linked != Some(here) => Some("partner does not link back"),
                        Some(_) => None,
                    }
                }
            };
            if let Some(reason) = reason {
                violations.push(LinkViolation {
                    position: here,
                    reason,
                });
            }
        }
        violations
    }
}
