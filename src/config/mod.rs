use crate::seatmap::grid::MAX_DIMENSION;
use crate::seatmap::labels::LabelConvention;
use serde::Deserialize;
use std::env;
use std::str::FromStr;
use tracing::warn;

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub seatmap: SeatMapConfig,
}

// Настройки приложения
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
}

// Настройки редактора схемы зала
#[derive(Debug, Clone, Deserialize)]
pub struct SeatMapConfig {
    /// Единое соглашение о подписях для всех схем этого сервиса.
    pub label_convention: LabelConvention,
    pub max_width: usize,
    pub max_height: usize,
    /// Персоналу разрешено оставлять одиночные места.
    pub allow_gap_seats_for_staff: bool,
}

impl Default for SeatMapConfig {
    fn default() -> Self {
        Self {
            label_convention: LabelConvention::LetterRow,
            max_width: 40,
            max_height: 26,
            allow_gap_seats_for_staff: true,
        }
    }
}

// Читает переменную окружения; кривое значение не роняет сервис
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value {:?}, using default", key, raw);
            default
        }),
        Err(_) => default,
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = SeatMapConfig::default();
        let label_convention = match env::var("SEATMAP_LABEL_CONVENTION") {
            Ok(raw) => LabelConvention::parse(&raw).unwrap_or_else(|| {
                warn!("SEATMAP_LABEL_CONVENTION has invalid value {:?}, using letter-row", raw);
                defaults.label_convention
            }),
            Err(_) => defaults.label_convention,
        };

        Config {
            app: AppConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env_or("PORT", 8000),
                environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
                rust_log: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "fcinema_seatmap=debug,tower_http=debug".to_string()),
            },
            seatmap: SeatMapConfig {
                label_convention,
                max_width: env_or("SEATMAP_MAX_WIDTH", defaults.max_width).clamp(1, MAX_DIMENSION),
                max_height: env_or("SEATMAP_MAX_HEIGHT", defaults.max_height).clamp(1, MAX_DIMENSION),
                allow_gap_seats_for_staff: env_or(
                    "SEATMAP_STAFF_ALLOW_GAPS",
                    defaults.allow_gap_seats_for_staff,
                ),
            },
        }
    }
}
