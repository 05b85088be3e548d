pub mod config;
pub mod controllers;
pub mod error;
pub mod models;
pub mod seatmap;

use std::sync::Arc;

pub use error::{Result, SeatMapError};

// Shared state для всего приложения. Схемы залов в нём не хранятся:
// каждый запрос работает со своей копией.
#[derive(Clone)]
pub struct AppState {
    pub config: config::Config,
}

impl AppState {
    pub fn new(config: config::Config) -> Arc<Self> {
        Arc::new(Self { config })
    }
}
