//! Преобразования между плоским списком мест (как его хранит бэкенд)
//! и двумерной сеткой редактора. Это единственное место, где одно
//! представление переводится в другое.

use crate::error::{Result, SeatMapError};
use crate::models::{
    Cell, CellKind, CellStatus, FlatSeat, Position, RoomId, SeatId, SeatKind, SeatStatus,
    SeatTypeName,
};
use crate::seatmap::grid::SeatMap;
use crate::seatmap::labels::LabelConvention;
use crate::seatmap::linking::parity_partner;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// Как была найдена (или не найдена) пара для места COUPLE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackResolution {
    /// `linkSeatId` битый, пара найдена по чётности колонки.
    Positional,
    /// Пару назначила ссылка соседа, а своя ссылка места устарела или пуста.
    OneSided,
    /// Пары нет вовсе, место загружено как обычное.
    Unpaired,
}

/// Запись для проверки качества данных: связь пришлось восстанавливать.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkFallback {
    pub seat_id: SeatId,
    pub position: Position,
    pub stored_link: Option<SeatId>,
    pub partner: Option<SeatId>,
    pub resolution: FallbackResolution,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HydratedSeatMap {
    pub map: SeatMap,
    pub link_fallbacks: Vec<LinkFallback>,
}

// Запись с уже разобранной координатой
struct Placed<'a> {
    record: &'a FlatSeat,
    position: Position,
}

/// Собирает сетку из плоского списка мест зала с каноническими подписями.
pub fn from_flat_seats(seats: &[FlatSeat], room_id: &RoomId) -> Result<HydratedSeatMap> {
    from_flat_seats_with(seats, room_id, LabelConvention::default())
}

pub fn from_flat_seats_with(
    seats: &[FlatSeat],
    room_id: &RoomId,
    convention: LabelConvention,
) -> Result<HydratedSeatMap> {
    let mut placed = Vec::new();
    for record in seats
        .iter()
        .filter(|s| !s.discarded && &s.room_id == room_id)
    {
        let row = convention.parse_row(&record.row);
        let column = convention.parse_column(&record.column);
        match (row, column) {
            (Some(row), Some(column)) => placed.push(Placed {
                record,
                position: Position::new(row, column),
            }),
            _ => {
                return Err(SeatMapError::MalformedSeatLabel {
                    seat_id: record.id.clone(),
                    row: record.row.clone(),
                    column: record.column.clone(),
                })
            }
        }
    }

    let height = placed.iter().map(|p| p.position.row + 1).max().unwrap_or(0);
    let width = placed.iter().map(|p| p.position.column + 1).max().unwrap_or(0);
    let mut map = SeatMap::empty(width, height, room_id.clone(), "", convention)?;

    // Координата -> запись. При дублях побеждает первая.
    let mut by_position: BTreeMap<Position, &Placed> = BTreeMap::new();
    for p in &placed {
        if let Some(existing) = by_position.get(&p.position) {
            warn!(
                "Seat {} duplicates position {} of seat {}, ignoring it",
                p.record.id, p.position, existing.record.id
            );
            continue;
        }
        by_position.insert(p.position, p);
    }
    let by_id: HashMap<&SeatId, Position> = by_position
        .values()
        .map(|p| (&p.record.id, p.position))
        .collect();

    let mut link_fallbacks = Vec::new();
    let mut paired: HashMap<Position, Position> = HashMap::new();

    // Соседняя клетка того же ряда, на которую указывает linkSeatId, если это COUPLE
    let stored_partner = |p: &Placed| {
        p.record
            .link_seat_id
            .as_ref()
            .and_then(|id| by_id.get(id).copied())
            .filter(|pos| pos.row == p.position.row && pos.column.abs_diff(p.position.column) == 1)
            .filter(|pos| {
                by_position
                    .get(pos)
                    .is_some_and(|other| other.record.seat_type_name == SeatTypeName::Couple)
            })
    };
    let couples: Vec<&Placed> = by_position
        .values()
        .copied()
        .filter(|p| p.record.seat_type_name == SeatTypeName::Couple)
        .collect();

    // 1. Взаимные ссылки. Каждая запись указывает ровно на одну, так что
    // такие пары не пересекаются и от порядка записей не зависят.
    for &p in &couples {
        if let Some(partner) = stored_partner(p) {
            let links_back = by_position
                .get(&partner)
                .is_some_and(|&other| stored_partner(other) == Some(p.position));
            if links_back {
                paired.insert(p.position, partner);
            }
        }
    }

    // 2. Односторонние ссылки: пара собирается, устаревшая ссылка партнёра
    // уходит в отчёт.
    for &p in &couples {
        if paired.contains_key(&p.position) {
            continue;
        }
        let Some(partner) = stored_partner(p).filter(|pos| !paired.contains_key(pos)) else {
            continue;
        };
        paired.insert(p.position, partner);
        paired.insert(partner, p.position);
        if let Some(other) = by_position.get(&partner) {
            warn!(
                "Couple seat {} links to {}, but {} links to {:?}",
                p.record.id, other.record.id, other.record.id, other.record.link_seat_id
            );
            link_fallbacks.push(LinkFallback {
                seat_id: other.record.id.clone(),
                position: partner,
                stored_link: other.record.link_seat_id.clone(),
                partner: Some(p.record.id.clone()),
                resolution: FallbackResolution::OneSided,
            });
        }
    }

    // 3. Чётность колонки - только для тех, кто остался без пары
    for &p in &couples {
        if paired.contains_key(&p.position) {
            continue;
        }
        let fallback = parity_partner(p.position).filter(|pos| {
            !paired.contains_key(pos)
                && by_position
                    .get(pos)
                    .is_some_and(|other| other.record.seat_type_name == SeatTypeName::Couple)
        });
        let partner_id = fallback
            .and_then(|pos| by_position.get(&pos))
            .map(|other| other.record.id.clone());
        let resolution = if fallback.is_some() {
            FallbackResolution::Positional
        } else {
            FallbackResolution::Unpaired
        };
        warn!(
            "Couple seat {} at {} has unusable link {:?}, resolution: {:?}",
            p.record.id, p.position, p.record.link_seat_id, resolution
        );
        link_fallbacks.push(LinkFallback {
            seat_id: p.record.id.clone(),
            position: p.position,
            stored_link: p.record.link_seat_id.clone(),
            partner: partner_id,
            resolution,
        });
        if let Some(partner) = fallback {
            paired.insert(p.position, partner);
            paired.insert(partner, p.position);
        }
    }

    for p in by_position.values() {
        let status = match p.record.status {
            SeatStatus::Available => CellStatus::Available,
            SeatStatus::Maintenance => CellStatus::Maintenance,
        };
        let cell = match p.record.seat_type_name {
            SeatTypeName::Regular => Cell::seat(p.position, convention, SeatKind::Standard, status),
            SeatTypeName::Vip => Cell::seat(p.position, convention, SeatKind::Vip, status),
            SeatTypeName::Path => Cell::aisle(p.position, convention),
            SeatTypeName::Block => Cell::blocked(p.position, convention),
            SeatTypeName::Couple => match paired.get(&p.position) {
                Some(&partner) => {
                    let kind = if p.position.column < partner.column {
                        SeatKind::DoublePrimary
                    } else {
                        SeatKind::DoubleSecondary
                    };
                    Cell::seat(p.position, convention, kind, status).linked_to(partner)
                }
                None => Cell::seat(p.position, convention, SeatKind::Standard, status),
            },
        };
        map.set(cell.with_record_id(Some(p.record.id.clone())))?;
    }

    debug!(
        "Hydrated room {} as {}x{} grid with {} seats",
        room_id,
        width,
        height,
        map.seat_count()
    );

    Ok(HydratedSeatMap {
        map,
        link_fallbacks,
    })
}

/// Идентификатор клетки для выгрузки: настоящий или временный.
pub fn record_id_for(map: &SeatMap, cell: &Cell) -> SeatId {
    cell.record_id
        .clone()
        .unwrap_or_else(|| SeatId::provisional(&map.convention().seat_label(cell.position)))
}

/// Обратное преобразование: одна запись на каждую непустую клетку.
/// Обе половины двойного места дают по записи и ссылаются друг на друга.
pub fn to_flat_seats(map: &SeatMap) -> Vec<FlatSeat> {
    let convention = map.convention();
    map.iter()
        .filter_map(|cell| {
            let (seat_type_name, status, link) = match &cell.content {
                CellKind::Empty => return None,
                CellKind::Aisle => (SeatTypeName::Path, SeatStatus::Available, None),
                CellKind::Blocked => (SeatTypeName::Block, SeatStatus::Available, None),
                CellKind::Seat(seat) => {
                    let type_name = match seat.kind {
                        SeatKind::Standard => SeatTypeName::Regular,
                        SeatKind::Vip => SeatTypeName::Vip,
                        SeatKind::DoublePrimary | SeatKind::DoubleSecondary => SeatTypeName::Couple,
                    };
                    let status = match seat.status {
                        CellStatus::Maintenance => SeatStatus::Maintenance,
                        _ => SeatStatus::Available,
                    };
                    let link = seat
                        .linked
                        .filter(|_| seat.kind.is_double())
                        .and_then(|pos| map.get(pos))
                        .map(|partner| record_id_for(map, partner));
                    (type_name, status, link)
                }
            };
            Some(FlatSeat {
                id: record_id_for(map, cell),
                row: convention.row_label(cell.position.row),
                column: convention.column_label(cell.position.column),
                room_id: map.room_id().clone(),
                seat_type_name,
                status,
                link_seat_id: link,
                discarded: false,
            })
        })
        .collect()
}
