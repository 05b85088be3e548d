//! Инструменты редактора схемы зала.
//!
//! Инструмент применяется к одной клетке или к прямоугольному выделению,
//! клетка за клеткой, на одной рабочей копии сетки. Пакет не атомарен:
//! ошибка в одной клетке попадает в отчёт, остальные клетки обрабатываются.
//! Атомарна только каждая отдельная операция с парой.

use crate::error::{Result, SeatMapError};
use crate::models::{CellStatus, Position};
use crate::seatmap::grid::SeatMap;
use crate::seatmap::linking::{create_double, resolve_partner, retype_cell, Retype};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tool {
    StandardSeat,
    VipSeat,
    DoubleSeat,
    Aisle,
    Blocked,
    Maintenance,
    Available,
    Eraser,
}

impl Tool {
    /// Инструменты, которые меняют только статус места.
    pub fn is_status_only(self) -> bool {
        matches!(self, Tool::Maintenance | Tool::Available)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Target {
    Single { position: Position },
    /// Прямоугольник, углы включительно, в любом порядке.
    Rect { from: Position, to: Position },
}

impl Target {
    pub fn single(row: usize, column: usize) -> Self {
        Target::Single {
            position: Position::new(row, column),
        }
    }

    pub fn rect(from: Position, to: Position) -> Self {
        Target::Rect { from, to }
    }

    /// Клетки цели построчно. Проверяет, что цель целиком внутри сетки.
    pub fn positions(&self, map: &SeatMap) -> Result<Vec<Position>> {
        let (from, to) = match *self {
            Target::Single { position } => (position, position),
            Target::Rect { from, to } => (from, to),
        };
        for corner in [from, to] {
            if !map.contains(corner) {
                return Err(map.out_of_range(corner));
            }
        }
        let rows = from.row.min(to.row)..=from.row.max(to.row);
        let columns = from.column.min(to.column)..=from.column.max(to.column);
        Ok(rows
            .flat_map(|r| columns.clone().map(move |c| Position::new(r, c)))
            .collect())
    }
}

/// Клетка, на которой инструмент не сработал.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellFailure {
    pub position: Position,
    pub code: &'static str,
    pub message: String,
    #[serde(skip)]
    pub error: SeatMapError,
}

impl CellFailure {
    fn new(position: Position, error: SeatMapError) -> Self {
        Self {
            position,
            code: error.code(),
            message: error.to_string(),
            error,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub applied: Vec<Position>,
    /// Клетки, к которым инструмент неприменим (например, статус для прохода).
    pub skipped: Vec<Position>,
    pub failures: Vec<CellFailure>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

enum Outcome {
    Applied,
    Skipped,
}

/// Применяет инструмент к цели на рабочей копии `map`.
///
/// Цель за пределами сетки - ошибка всего запроса, сетка не меняется.
/// Ошибки отдельных клеток собираются в отчёт.
pub fn apply_tool(map: &mut SeatMap, tool: Tool, target: &Target) -> Result<BatchReport> {
    let positions = target.positions(map)?;
    let mut report = BatchReport::default();
    for position in positions {
        match apply_to_cell(map, tool, position) {
            Ok(Outcome::Applied) => report.applied.push(position),
            Ok(Outcome::Skipped) => {
                debug!("Tool {:?} does not apply to cell {}", tool, position);
                report.skipped.push(position);
            }
            Err(err) => {
                debug!("Tool {:?} failed at {}: {}", tool, position, err);
                report.failures.push(CellFailure::new(position, err));
            }
        }
    }
    Ok(report)
}

fn apply_to_cell(map: &mut SeatMap, tool: Tool, position: Position) -> Result<Outcome> {
    let retype = match tool {
        Tool::StandardSeat => Retype::Standard,
        Tool::VipSeat => Retype::Vip,
        Tool::Aisle => Retype::Aisle,
        Tool::Blocked => Retype::Blocked,
        Tool::Eraser => Retype::Empty,
        Tool::DoubleSeat => {
            create_double(map, position)?;
            return Ok(Outcome::Applied);
        }
        Tool::Maintenance => return set_status(map, position, CellStatus::Maintenance),
        Tool::Available => return set_status(map, position, CellStatus::Available),
    };
    retype_cell(map, position, retype)?;
    Ok(Outcome::Applied)
}

// Статус пары меняется целиком, тип и связи не трогаются
fn set_status(map: &mut SeatMap, position: Position, status: CellStatus) -> Result<Outcome> {
    if map.cell(position)?.as_seat().is_none() {
        return Ok(Outcome::Skipped);
    }
    let partner = resolve_partner(map, position);
    for pos in std::iter::once(position).chain(partner) {
        if let Some(seat) = map.cell_mut(pos)?.as_seat_mut() {
            seat.status = status;
        }
    }
    Ok(Outcome::Applied)
}
