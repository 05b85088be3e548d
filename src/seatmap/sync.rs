//! План сохранения: что создать, обновить и пометить удалённым, чтобы
//! сохранённый плоский список совпал с отредактированным.
//! Само сохранение делает слой бронирования.

use crate::models::{FlatSeat, SeatId};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncPlan {
    pub created: Vec<FlatSeat>,
    pub updated: Vec<FlatSeat>,
    /// Записи, исчезнувшие из схемы, с `discarded = true`.
    pub discarded: Vec<FlatSeat>,
}

impl SyncPlan {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.updated.is_empty() && self.discarded.is_empty()
    }
}

pub fn plan_sync(before: &[FlatSeat], after: &[FlatSeat]) -> SyncPlan {
    let persisted: HashMap<&SeatId, &FlatSeat> = before
        .iter()
        .filter(|seat| !seat.discarded)
        .map(|seat| (&seat.id, seat))
        .collect();
    let kept: HashMap<&SeatId, &FlatSeat> = after.iter().map(|seat| (&seat.id, seat)).collect();

    let mut plan = SyncPlan::default();
    for seat in after {
        match persisted.get(&seat.id) {
            None => plan.created.push(seat.clone()),
            Some(old) if *old != seat => plan.updated.push(seat.clone()),
            Some(_) => {}
        }
    }
    for seat in before.iter().filter(|seat| !seat.discarded) {
        if !kept.contains_key(&seat.id) {
            plan.discarded.push(FlatSeat {
                discarded: true,
                ..seat.clone()
            });
        }
    }
    plan
}
