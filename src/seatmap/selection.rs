//! Правило "без одиночных мест" при выборе мест покупателем.
//!
//! Нельзя выбрать место так, чтобы в ряду осталось одно свободное место,
//! зажатое между занятыми. Проверка - чистая функция от снимка занятости
//! ряда; её нужно пересчитывать при каждом выборе, ничего не кэшируя.
//!
//! Алгоритм для кандидата `s` в ряду `R`:
//! 1. берём доступные для продажи места ряда, упорядоченные по колонке;
//! 2. занятые = выбранные пользователем + купленные другими + зарезервированные;
//! 3. свободные места разбиваем на группы подряд идущих колонок;
//! 4. пропускаем проверку, если `s` двойное, свободных мест не больше двух
//!    или `s` стоит с края одной из групп;
//! 5. иначе убираем `s` из свободных и отказываем, если появилась группа из одного места.
//!
//! Флаг `allow_gaps` (редактирование персоналом) отключает правило целиком.

use crate::error::{Result, SeatMapError};
use crate::models::{CellStatus, FlatSeat, Position, SeatId, SeatTypeName};
use crate::seatmap::grid::SeatMap;
use crate::seatmap::labels::LabelConvention;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Снимок занятости мест зала на момент выбора.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Occupancy {
    #[serde(default)]
    pub selected_by_user: HashSet<SeatId>,
    #[serde(default)]
    pub booked_by_others: HashSet<SeatId>,
    /// Места, помеченные внешним сигналом резерва (`selected=true`).
    #[serde(default)]
    pub reserved: HashSet<SeatId>,
}

impl Occupancy {
    pub fn is_occupied(&self, id: &SeatId) -> bool {
        self.selected_by_user.contains(id)
            || self.booked_by_others.contains(id)
            || self.reserved.contains(id)
    }
}

/// Место ряда, доступное для продажи.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSeat {
    pub column: usize,
    pub label: String,
    pub is_double: bool,
    pub occupied: bool,
}

/// Разбивает отсортированные колонки на группы подряд идущих.
pub fn consecutive_groups(columns: &[usize]) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for &column in columns {
        match groups.last_mut() {
            Some(group) if group.last().is_some_and(|&prev| prev + 1 == column) => group.push(column),
            _ => groups.push(vec![column]),
        }
    }
    groups
}

/// Проверка по снимку одного ряда. `row` - только продаваемые места ряда.
pub fn check_row_selection(row: &[RowSeat], candidate_column: usize) -> Result<()> {
    let Some(candidate) = row.iter().find(|seat| seat.column == candidate_column) else {
        return Ok(());
    };
    // Занятое место - вопрос доступности, а не этого правила
    if candidate.occupied || candidate.is_double {
        return Ok(());
    }

    let mut empty: Vec<&RowSeat> = row.iter().filter(|seat| !seat.occupied).collect();
    if empty.len() <= 2 {
        return Ok(());
    }
    empty.sort_by_key(|seat| seat.column);
    let columns: Vec<usize> = empty.iter().map(|seat| seat.column).collect();

    let at_edge = consecutive_groups(&columns)
        .iter()
        .any(|group| group.first() == Some(&candidate_column) || group.last() == Some(&candidate_column));
    if at_edge {
        return Ok(());
    }

    let remaining: Vec<usize> = columns.into_iter().filter(|&c| c != candidate_column).collect();
    let orphans: Vec<String> = consecutive_groups(&remaining)
        .into_iter()
        .filter(|group| group.len() == 1)
        .filter_map(|group| empty.iter().find(|seat| seat.column == group[0]))
        .map(|seat| seat.label.clone())
        .collect();

    if orphans.is_empty() {
        Ok(())
    } else {
        debug!("Rejecting seat {}: would strand {:?}", candidate.label, orphans);
        Err(SeatMapError::WouldCreateOrphanGap {
            seat: candidate.label.clone(),
            orphans,
        })
    }
}

/// Проверка кандидата по плоскому списку мест зала.
pub fn check_selection(
    seats: &[FlatSeat],
    candidate: &SeatId,
    occupancy: &Occupancy,
    allow_gaps: bool,
    convention: LabelConvention,
) -> Result<()> {
    if allow_gaps {
        return Ok(());
    }
    let Some(target) = seats.iter().find(|seat| &seat.id == candidate && !seat.discarded) else {
        debug!("Seat {} is not in the room snapshot, nothing to check", candidate);
        return Ok(());
    };

    let parse_position = |seat: &FlatSeat| {
        convention
            .parse_row(&seat.row)
            .zip(convention.parse_column(&seat.column))
            .map(|(row, column)| Position::new(row, column))
            .ok_or_else(|| SeatMapError::MalformedSeatLabel {
                seat_id: seat.id.clone(),
                row: seat.row.clone(),
                column: seat.column.clone(),
            })
    };
    let candidate = parse_position(target)?;

    // Ряд сравниваем по индексу: "b", " B" и "B" - один ряд
    let mut row = Vec::new();
    for seat in seats
        .iter()
        .filter(|seat| seat.room_id == target.room_id && seat.is_selectable())
    {
        let position = parse_position(seat)?;
        if position.row != candidate.row {
            continue;
        }
        row.push(RowSeat {
            column: position.column,
            label: convention.seat_label(position),
            is_double: seat.seat_type_name == SeatTypeName::Couple,
            occupied: occupancy.is_occupied(&seat.id),
        });
    }
    check_row_selection(&row, candidate.column)
}

/// То же правило по строке сетки: занятыми считаются клетки со статусом
/// `taken`/`selected` и записи из `occupancy`.
pub fn check_grid_selection(
    map: &SeatMap,
    position: Position,
    occupancy: &Occupancy,
    allow_gaps: bool,
) -> Result<()> {
    map.cell(position)?;
    if allow_gaps {
        return Ok(());
    }
    let row: Vec<RowSeat> = map
        .row(position.row)
        .unwrap_or_default()
        .iter()
        .filter_map(|cell| {
            let seat = cell.as_seat()?;
            if seat.status == CellStatus::Maintenance {
                return None;
            }
            let booked = cell.record_id.as_ref().is_some_and(|id| occupancy.is_occupied(id));
            Some(RowSeat {
                column: cell.position.column,
                label: seat.label.clone(),
                is_double: seat.kind.is_double(),
                occupied: booked || matches!(seat.status, CellStatus::Taken | CellStatus::Selected),
            })
        })
        .collect();
    check_row_selection(&row, position.column)
}
