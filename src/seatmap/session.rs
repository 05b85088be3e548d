//! Сессия редактирования с оптимистичным обновлением.
//!
//! Изменения сразу применяются к рабочей копии. Если внешнее сохранение
//! не удалось, рабочая копия выбрасывается целиком и заменяется последним
//! сохранённым снимком - отдельные поля назад не откатываются.

use crate::error::Result;
use crate::models::FlatSeat;
use crate::seatmap::convert::to_flat_seats;
use crate::seatmap::grid::SeatMap;
use crate::seatmap::sync::{plan_sync, SyncPlan};
use crate::seatmap::tools::{apply_tool, BatchReport, Target, Tool};
use tracing::info;

#[derive(Debug, Clone)]
pub struct EditSession {
    persisted: SeatMap,
    working: SeatMap,
}

impl EditSession {
    pub fn new(map: SeatMap) -> Self {
        Self {
            working: map.clone(),
            persisted: map,
        }
    }

    pub fn working(&self) -> &SeatMap {
        &self.working
    }

    pub fn persisted(&self) -> &SeatMap {
        &self.persisted
    }

    pub fn is_dirty(&self) -> bool {
        self.working != self.persisted
    }

    pub fn apply(&mut self, tool: Tool, target: &Target) -> Result<BatchReport> {
        apply_tool(&mut self.working, tool, target)
    }

    /// Что нужно сохранить, чтобы база совпала с рабочей копией.
    pub fn pending_changes(&self) -> SyncPlan {
        plan_sync(&to_flat_seats(&self.persisted), &to_flat_seats(&self.working))
    }

    /// Сохранение прошло: рабочая копия становится снимком.
    pub fn commit(&mut self) -> Vec<FlatSeat> {
        self.persisted = self.working.clone();
        info!("Committed seat map of room {}", self.persisted.room_id());
        to_flat_seats(&self.persisted)
    }

    /// Сохранение не прошло: возвращаемся к снимку.
    pub fn rollback(&mut self) {
        self.working = self.persisted.clone();
        info!("Rolled back seat map of room {}", self.persisted.room_id());
    }

    /// Полная замена схемы, например после перезагрузки с сервера.
    pub fn reset(&mut self, map: SeatMap) {
        *self = Self::new(map);
    }
}
