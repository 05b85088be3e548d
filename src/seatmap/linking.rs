//! Двойные (парные) места.
//!
//! Пара всегда занимает две соседние клетки одного ряда: левая - основная
//! (`DoublePrimary`, рисуется на две колонки), правая - вторичная. Обе
//! ссылаются друг на друга координатой. Любая операция, меняющая одну
//! половину, в том же вызове меняет и вторую.
//!
//! Все операции сначала проверяют, что изменение возможно, и только
//! потом трогают клетки.

use crate::error::{PartnerProblem, Result, SeatMapError};
use crate::models::{Cell, CellStatus, Position, SeatKind};
use crate::seatmap::grid::SeatMap;
use crate::seatmap::labels::LabelConvention;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Колонка-партнёр по чётности: нечётный номер места (1, 3, ...) в паре
/// со следующим, чётный - с предыдущим.
pub fn partner_column(column: usize) -> Option<usize> {
    if column % 2 == 0 {
        column.checked_add(1)
    } else {
        Some(column - 1)
    }
}

pub fn parity_partner(position: Position) -> Option<Position> {
    partner_column(position.column).map(|column| Position::new(position.row, column))
}

/// Во что превращаются клетки при перетипизации.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Retype {
    Empty,
    Standard,
    Vip,
    Aisle,
    Blocked,
}

impl Retype {
    /// Новая клетка на месте `previous`. Запись в базе сохраняется у всего,
    /// кроме стёртой клетки; статус места - у мест.
    pub fn build(self, previous: &Cell, convention: LabelConvention) -> Cell {
        let position = previous.position;
        let status = previous.status().unwrap_or_default();
        let cell = match self {
            Retype::Empty => return Cell::empty(position, convention),
            Retype::Standard => Cell::seat(position, convention, SeatKind::Standard, status),
            Retype::Vip => Cell::seat(position, convention, SeatKind::Vip, status),
            Retype::Aisle => Cell::aisle(position, convention),
            Retype::Blocked => Cell::blocked(position, convention),
        };
        cell.with_record_id(previous.record_id.clone())
    }
}

/// Настоящий партнёр половины двойного места: сначала по сохранённой
/// связи, если она взаимна, иначе по чётности колонки.
pub fn resolve_partner(map: &SeatMap, position: Position) -> Option<Position> {
    let seat = map.get(position)?.as_seat()?;
    if !seat.kind.is_double() {
        return None;
    }
    if let Some(linked) = seat.linked {
        let links_back = map
            .get(linked)
            .and_then(Cell::as_seat)
            .is_some_and(|other| other.kind.is_double() && other.linked == Some(position));
        if links_back {
            return Some(linked);
        }
    }
    // Сосед по чётности подходит, только если он сам не состоит в целой паре
    let fallback = parity_partner(position)
        .filter(|pos| map.get(*pos).is_some_and(Cell::is_double))
        .filter(|pos| !in_mutual_pair_elsewhere(map, *pos, position))?;
    warn!(
        "Broken double-seat link at {} (stored {:?}), using positional partner {}",
        position, seat.linked, fallback
    );
    Some(fallback)
}

// `position` связана взаимной ссылкой с кем-то, кроме `except`
fn in_mutual_pair_elsewhere(map: &SeatMap, position: Position, except: Position) -> bool {
    let Some(linked) = map.get(position).and_then(Cell::as_seat).and_then(|seat| seat.linked) else {
        return false;
    };
    linked != except
        && map
            .get(linked)
            .and_then(Cell::as_seat)
            .is_some_and(|other| other.kind.is_double() && other.linked == Some(position))
}

/// Делает двойное место из клетки и её соседа по чётности.
/// Возвращает `(основная, вторичная)`.
pub fn create_double(map: &mut SeatMap, position: Position) -> Result<(Position, Position)> {
    let source = map.cell(position)?;
    let reject = |reason| SeatMapError::NoEligiblePartner { position, reason };

    let partner = parity_partner(position)
        .filter(|pos| map.contains(*pos))
        .ok_or(reject(PartnerProblem::OutOfRange))?;
    let partner_cell = map.cell(partner)?;
    if partner_cell.is_obstacle() {
        return Err(reject(PartnerProblem::Unavailable));
    }

    let source_pair = resolve_partner(map, position);
    let partner_pair = resolve_partner(map, partner);
    if partner_pair.is_some_and(|other| other != position) {
        return Err(reject(PartnerProblem::AlreadyPaired));
    }

    let status = source.status().unwrap_or(CellStatus::Available);
    let source_id = source.record_id.clone();
    let partner_id = partner_cell.record_id.clone();
    let convention = map.convention();

    // Место не может состоять в двух парах: старую пару распускаем
    if let Some(old) = source_pair.filter(|old| *old != partner) {
        debug!("Unlinking {} from previous partner {}", position, old);
        let old_cell = map.cell(old)?.clone();
        map.set(Retype::Standard.build(&old_cell, convention))?;
    }

    let (primary, secondary) = if position.column < partner.column {
        ((position, source_id), (partner, partner_id))
    } else {
        ((partner, partner_id), (position, source_id))
    };
    map.set(
        Cell::seat(primary.0, convention, SeatKind::DoublePrimary, status)
            .linked_to(secondary.0)
            .with_record_id(primary.1),
    )?;
    map.set(
        Cell::seat(secondary.0, convention, SeatKind::DoubleSecondary, status)
            .linked_to(primary.0)
            .with_record_id(secondary.1),
    )?;
    Ok((primary.0, secondary.0))
}

/// Меняет тип клетки. Если это половина двойного места, вторая половина
/// получает тот же тип в этом же вызове. Возвращает партнёра, если он был.
pub fn retype_cell(map: &mut SeatMap, position: Position, into: Retype) -> Result<Option<Position>> {
    let cell = map.cell(position)?.clone();
    let partner = resolve_partner(map, position);
    let partner_cell = match partner {
        Some(pos) => Some(map.cell(pos)?.clone()),
        None => None,
    };

    let convention = map.convention();
    map.set(into.build(&cell, convention))?;
    if let Some(partner_cell) = partner_cell {
        map.set(into.build(&partner_cell, convention))?;
    }
    Ok(partner)
}

/// Распускает пару, оставляя обе половины обычными местами.
pub fn unlink(map: &mut SeatMap, position: Position) -> Result<Option<Position>> {
    if map.cell(position)?.is_double() {
        retype_cell(map, position, Retype::Standard)
    } else {
        Ok(None)
    }
}
