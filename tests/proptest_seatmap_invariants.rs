//! Property-based invariant tests for the seat map core.
//!
//! 1. Flat list -> grid -> flat list preserves every record.
//! 2. Any sequence of tool applications leaves double seats mutually linked,
//!    including rooms loaded from stale, one-sided or missing links.
//! 3. An accepted non-exempt selection never strands a single seat.
//! 4. Status tools are idempotent.
//! 5. Row-end seats are always selectable.

use fcinema_seatmap::models::{FlatSeat, Position, RoomId, SeatId, SeatStatus, SeatTypeName};
use fcinema_seatmap::seatmap::labels::LabelConvention;
use fcinema_seatmap::seatmap::selection::{check_row_selection, RowSeat};
use fcinema_seatmap::seatmap::{
    apply_tool, build_empty_grid, check_selection, from_flat_seats, to_flat_seats, Occupancy, SeatMap,
    Target, Tool,
};
use proptest::prelude::*;
use std::collections::HashMap;

// ── Helpers ─────────────────────────────────────────────────────────────

const ROOM: &str = "R1";

/// Коды клеток: 0 пусто, 1 обычное, 2 VIP, 3 проход, 4 блок, 5 пара, 6 обычное на ремонте.
fn layout_strategy() -> impl Strategy<Value = Vec<Vec<u8>>> {
    (1usize..=8, 1usize..=5).prop_flat_map(|(width, height)| {
        prop::collection::vec(prop::collection::vec(0u8..7, width), height)
    })
}

fn layout_to_seats(layout: &[Vec<u8>]) -> Vec<FlatSeat> {
    let conv = LabelConvention::LetterRow;
    let mut seats = Vec::new();
    let mut next_id = 1;
    let mut push = |r: usize, c: usize, kind: SeatTypeName, status: SeatStatus, link: Option<SeatId>| {
        let id = SeatId::from(next_id);
        next_id += 1;
        seats.push(FlatSeat {
            id: id.clone(),
            row: conv.row_label(r),
            column: conv.column_label(c),
            room_id: RoomId::from(ROOM),
            seat_type_name: kind,
            status,
            link_seat_id: link,
            discarded: false,
        });
        id
    };
    for (r, row) in layout.iter().enumerate() {
        let mut c = 0;
        while c < row.len() {
            match row[c] {
                5 if c % 2 == 0 && c + 1 < row.len() => {
                    // ссылку первой половины на вторую проставим после цикла
                    let first = push(r, c, SeatTypeName::Couple, SeatStatus::Available, None);
                    push(r, c + 1, SeatTypeName::Couple, SeatStatus::Available, Some(first));
                    c += 2;
                    continue;
                }
                0 => {}
                1 | 5 => {
                    push(r, c, SeatTypeName::Regular, SeatStatus::Available, None);
                }
                2 => {
                    push(r, c, SeatTypeName::Vip, SeatStatus::Available, None);
                }
                3 => {
                    push(r, c, SeatTypeName::Path, SeatStatus::Available, None);
                }
                4 => {
                    push(r, c, SeatTypeName::Block, SeatStatus::Available, None);
                }
                _ => {
                    push(r, c, SeatTypeName::Regular, SeatStatus::Maintenance, None);
                }
            }
            c += 1;
        }
    }
    let links: Vec<(SeatId, SeatId)> = seats
        .iter()
        .filter_map(|s| s.link_seat_id.clone().map(|first| (first, s.id.clone())))
        .collect();
    for (first, second) in links {
        if let Some(seat) = seats.iter_mut().find(|s| s.id == first) {
            seat.link_seat_id = Some(second);
        }
    }
    seats
}

/// Каждая клетка с кодом 5 - отдельная запись COUPLE; ссылки раздаются
/// по `links`: 0 правый сосед, 1 левый сосед, 2 пусто, 3 несуществующий id,
/// иначе произвольная запись зала. Получаются взаимные, односторонние,
/// устаревшие и не совпадающие с чётностью связи.
fn dirty_layout_to_seats(layout: &[Vec<u8>], links: &[(u8, usize)]) -> Vec<FlatSeat> {
    let conv = LabelConvention::LetterRow;
    let mut seats = Vec::new();
    for (r, row) in layout.iter().enumerate() {
        for (c, &code) in row.iter().enumerate() {
            let seat_type_name = match code {
                0 => continue,
                2 => SeatTypeName::Vip,
                3 => SeatTypeName::Path,
                4 => SeatTypeName::Block,
                5 => SeatTypeName::Couple,
                _ => SeatTypeName::Regular,
            };
            seats.push(FlatSeat {
                id: SeatId::new(format!("{}-{}", r, c)),
                row: conv.row_label(r),
                column: conv.column_label(c),
                room_id: RoomId::from(ROOM),
                seat_type_name,
                status: SeatStatus::Available,
                link_seat_id: None,
                discarded: false,
            });
        }
    }
    let ids: Vec<SeatId> = seats.iter().map(|s| s.id.clone()).collect();
    for (i, seat) in seats.iter_mut().enumerate() {
        if seat.seat_type_name != SeatTypeName::Couple {
            continue;
        }
        let (choice, pick) = links[i % links.len()];
        let (r, c) = (conv.parse_row(&seat.row).unwrap(), conv.parse_column(&seat.column).unwrap());
        seat.link_seat_id = match choice {
            0 => Some(SeatId::new(format!("{}-{}", r, c + 1))),
            1 if c > 0 => Some(SeatId::new(format!("{}-{}", r, c - 1))),
            1 | 2 => None,
            3 => Some(SeatId::from("gone")),
            _ => Some(ids[pick % ids.len()].clone()),
        };
    }
    seats
}

/// Пары соседних COUPLE-записей одного ряда, ссылающихся друг на друга.
fn mutual_adjacent_pairs(seats: &[FlatSeat]) -> Vec<(Position, Position)> {
    let conv = LabelConvention::LetterRow;
    let by_id: HashMap<&SeatId, &FlatSeat> = seats.iter().map(|s| (&s.id, s)).collect();
    let position = |s: &FlatSeat| Position::new(conv.parse_row(&s.row).unwrap(), conv.parse_column(&s.column).unwrap());
    seats
        .iter()
        .filter(|s| s.seat_type_name == SeatTypeName::Couple)
        .filter_map(|s| {
            let other: &FlatSeat = by_id.get(s.link_seat_id.as_ref()?)?;
            let (here, there) = (position(s), position(other));
            let mutual = other.seat_type_name == SeatTypeName::Couple
                && other.link_seat_id.as_ref() == Some(&s.id)
                && here.row == there.row
                && here.column.abs_diff(there.column) == 1;
            (mutual && here.column < there.column).then_some((here, there))
        })
        .collect()
}

fn dirty_room_strategy() -> impl Strategy<Value = (Vec<Vec<u8>>, Vec<(u8, usize)>)> {
    // чаще пары, чтобы ссылкам было на что указывать
    let code = prop_oneof![2 => Just(5u8), 1 => 0u8..7];
    (
        (1usize..=8, 1usize..=5).prop_flat_map(move |(width, height)| {
            prop::collection::vec(prop::collection::vec(code.clone(), width), height)
        }),
        prop::collection::vec((0u8..6, any::<usize>()), 1..48),
    )
}

fn tool_strategy() -> impl Strategy<Value = Tool> {
    prop_oneof![
        Just(Tool::StandardSeat),
        Just(Tool::VipSeat),
        Just(Tool::DoubleSeat),
        Just(Tool::DoubleSeat),
        Just(Tool::Aisle),
        Just(Tool::Blocked),
        Just(Tool::Maintenance),
        Just(Tool::Available),
        Just(Tool::Eraser),
    ]
}

fn op_strategy(width: usize, height: usize) -> impl Strategy<Value = (Tool, Target)> {
    let single = (0..height, 0..width).prop_map(|(r, c)| Target::single(r, c));
    let rect = (0..height, 0..width, 0..height, 0..width)
        .prop_map(|(r1, c1, r2, c2)| Target::rect(Position::new(r1, c1), Position::new(r2, c2)));
    (tool_strategy(), prop_oneof![3 => single, 1 => rect])
}

fn hydrated(layout: &[Vec<u8>]) -> Option<SeatMap> {
    let seats = layout_to_seats(layout);
    if seats.is_empty() {
        return None;
    }
    Some(from_flat_seats(&seats, &RoomId::from(ROOM)).ok()?.map)
}

fn sorted(mut seats: Vec<FlatSeat>) -> Vec<FlatSeat> {
    seats.sort_by(|a, b| a.id.cmp(&b.id));
    seats
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Round trip
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn flat_grid_flat_round_trip(layout in layout_strategy()) {
        let seats = layout_to_seats(&layout);
        prop_assume!(!seats.is_empty());
        let hydrated = from_flat_seats(&seats, &RoomId::from(ROOM)).unwrap();
        prop_assert!(hydrated.link_fallbacks.is_empty());
        prop_assert_eq!(sorted(to_flat_seats(&hydrated.map)), sorted(seats));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Double-seat mutual consistency
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn tool_sequences_keep_links_mutual(
        (width, height, ops) in (1usize..=7, 1usize..=4).prop_flat_map(|(w, h)| {
            (Just(w), Just(h), prop::collection::vec(op_strategy(w, h), 1..25))
        })
    ) {
        let mut map = build_empty_grid(width, height, RoomId::from(ROOM), "").unwrap();
        for (tool, target) in ops {
            let report = apply_tool(&mut map, tool, &target).unwrap();
            let violations = map.link_violations();
            prop_assert!(violations.is_empty(), "after {:?} on {:?}: {:?} ({:?})", tool, target, violations, report);
        }
    }

    #[test]
    fn tool_sequences_on_hydrated_rooms_keep_links_mutual(
        layout in layout_strategy(),
        raw_ops in prop::collection::vec((tool_strategy(), 0usize..8, 0usize..5), 1..15)
    ) {
        let Some(mut map) = hydrated(&layout) else { return Ok(()); };
        for (tool, r, c) in raw_ops {
            let target = Target::single(r % map.height(), c % map.width());
            apply_tool(&mut map, tool, &target).unwrap();
            prop_assert!(map.link_violations().is_empty());
        }
    }

    #[test]
    fn dirty_links_load_into_consistent_pairs(
        (layout, links) in dirty_room_strategy()
    ) {
        let seats = dirty_layout_to_seats(&layout, &links);
        prop_assume!(!seats.is_empty());
        let hydrated = from_flat_seats(&seats, &RoomId::from(ROOM)).unwrap();
        let map = &hydrated.map;
        prop_assert!(map.link_violations().is_empty(), "{:?}", map.link_violations());

        // целая пара из входных данных никогда не разбивается
        for (left, right) in mutual_adjacent_pairs(&seats) {
            let primary = map.get(left).and_then(|c| c.as_seat()).unwrap();
            let secondary = map.get(right).and_then(|c| c.as_seat()).unwrap();
            prop_assert_eq!(primary.linked, Some(right));
            prop_assert_eq!(secondary.linked, Some(left));
        }

        // порядок записей не важен
        let mut reversed = seats.clone();
        reversed.reverse();
        prop_assert_eq!(&from_flat_seats(&reversed, &RoomId::from(ROOM)).unwrap(), &hydrated);
    }

    #[test]
    fn tool_sequences_on_dirty_rooms_keep_links_mutual(
        (layout, links) in dirty_room_strategy(),
        raw_ops in prop::collection::vec((tool_strategy(), 0usize..8, 0usize..5), 1..15)
    ) {
        let seats = dirty_layout_to_seats(&layout, &links);
        prop_assume!(!seats.is_empty());
        let mut map = from_flat_seats(&seats, &RoomId::from(ROOM)).unwrap().map;
        for (tool, r, c) in raw_ops {
            let target = Target::single(r % map.height(), c % map.width());
            apply_tool(&mut map, tool, &target).unwrap();
            prop_assert!(map.link_violations().is_empty(), "after {:?} on {:?}", tool, target);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. No orphan gap
// ═════════════════════════════════════════════════════════════════════════

/// Длины подряд идущих свободных мест ряда.
fn empty_runs(occupied: &[bool]) -> Vec<usize> {
    let mut runs = Vec::new();
    let mut current = 0;
    for &taken in occupied {
        if taken {
            if current > 0 {
                runs.push(current);
            }
            current = 0;
        } else {
            current += 1;
        }
    }
    if current > 0 {
        runs.push(current);
    }
    runs
}

proptest! {
    #[test]
    fn accepted_interior_selection_leaves_no_single_seat(
        occupied in prop::collection::vec(any::<bool>(), 3..14),
        candidate in 0usize..14,
    ) {
        let row: Vec<RowSeat> = occupied
            .iter()
            .enumerate()
            .map(|(c, &occupied)| RowSeat { column: c, label: format!("A{}", c + 1), is_double: false, occupied })
            .collect();
        let result = check_row_selection(&row, candidate);

        let free = |c: usize| occupied.get(c) == Some(&false);
        let at_run_edge = free(candidate)
            && (candidate == 0 || !free(candidate - 1) || !free(candidate + 1));
        let exempt = !free(candidate)
            || occupied.iter().filter(|&&taken| !taken).count() <= 2
            || at_run_edge;

        if exempt {
            prop_assert!(result.is_ok());
        } else {
            let mut after = occupied.clone();
            after[candidate] = true;
            let singles = empty_runs(&after).into_iter().filter(|&len| len == 1).count();
            match result {
                Ok(()) => prop_assert_eq!(singles, 0, "accepted {} in {:?}", candidate, occupied),
                Err(err) => prop_assert!(singles > 0, "rejected {} in {:?}: {}", candidate, occupied, err),
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Status tool idempotence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn status_tools_are_idempotent(
        layout in layout_strategy(),
        corners in (0usize..5, 0usize..8, 0usize..5, 0usize..8),
        maintenance in any::<bool>(),
    ) {
        let Some(mut map) = hydrated(&layout) else { return Ok(()); };
        let (r1, c1, r2, c2) = corners;
        let target = Target::rect(
            Position::new(r1 % map.height(), c1 % map.width()),
            Position::new(r2 % map.height(), c2 % map.width()),
        );
        let tool = if maintenance { Tool::Maintenance } else { Tool::Available };

        apply_tool(&mut map, tool, &target).unwrap();
        let once = map.clone();
        apply_tool(&mut map, tool, &target).unwrap();
        prop_assert_eq!(map, once);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Edge-seat exemption
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn row_ends_are_always_selectable(
        taken in prop::collection::vec(any::<bool>(), 3),
        pick_last in any::<bool>(),
    ) {
        let seats: Vec<FlatSeat> = (1..=5)
            .map(|c| FlatSeat {
                id: SeatId::new(format!("A{}", c)),
                row: "A".into(),
                column: c.to_string(),
                room_id: RoomId::from(ROOM),
                seat_type_name: SeatTypeName::Regular,
                status: SeatStatus::Available,
                link_seat_id: None,
                discarded: false,
            })
            .collect();
        let mut occupancy = Occupancy::default();
        for (i, &is_taken) in taken.iter().enumerate() {
            if is_taken {
                occupancy.booked_by_others.insert(SeatId::new(format!("A{}", i + 2)));
            }
        }
        let candidate = SeatId::from(if pick_last { "A5" } else { "A1" });
        prop_assert!(check_selection(&seats, &candidate, &occupancy, false, LabelConvention::LetterRow).is_ok());
    }
}
