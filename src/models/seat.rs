use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// Бэкенд отдаёт идентификаторы то числом, то строкой - принимаем оба варианта
#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Int(i64),
    Str(String),
}

impl From<StringOrNumber> for String {
    fn from(raw: StringOrNumber) -> Self {
        match raw {
            StringOrNumber::Int(n) => n.to_string(),
            StringOrNumber::Str(s) => s,
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(StringOrNumber::deserialize(deserializer)?.into())
}

/// Идентификатор места в базе бронирования.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SeatId(String);

impl<'de> Deserialize<'de> for SeatId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        string_or_number(deserializer).map(SeatId)
    }
}

impl SeatId {
    pub fn new(id: impl Into<String>) -> Self {
        SeatId(id.into())
    }

    /// Временный идентификатор для места, которого ещё нет в базе.
    /// Детерминирован: зависит только от подписи места.
    pub fn provisional(label: &str) -> Self {
        SeatId(format!("new-{}", label))
    }

    pub fn is_provisional(&self) -> bool {
        self.0.starts_with("new-")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SeatId {
    fn from(id: &str) -> Self {
        SeatId(id.to_string())
    }
}

impl From<i64> for SeatId {
    fn from(id: i64) -> Self {
        SeatId(id.to_string())
    }
}

/// Идентификатор зала.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl<'de> Deserialize<'de> for RoomId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        string_or_number(deserializer).map(RoomId)
    }
}

impl RoomId {
    pub fn new(id: impl Into<String>) -> Self {
        RoomId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    fn from(id: &str) -> Self {
        RoomId(id.to_string())
    }
}

impl From<i64> for RoomId {
    fn from(id: i64) -> Self {
        RoomId(id.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatTypeName {
    Regular,
    Vip,
    Couple,
    Path,
    Block,
}

impl SeatTypeName {
    /// Проходы и заблокированные клетки - не места для продажи.
    pub fn is_sellable(self) -> bool {
        !matches!(self, SeatTypeName::Path | SeatTypeName::Block)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatStatus {
    #[default]
    Available,
    Maintenance,
}

/// Место в том виде, в котором его хранит и отдаёт бэкенд бронирования.
/// Лишние поля из API игнорируются.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatSeat {
    pub id: SeatId,
    #[serde(deserialize_with = "string_or_number")]
    pub row: String,
    #[serde(deserialize_with = "string_or_number")]
    pub column: String,
    pub room_id: RoomId,
    pub seat_type_name: SeatTypeName,
    #[serde(default)]
    pub status: SeatStatus,
    #[serde(default)]
    pub link_seat_id: Option<SeatId>,
    #[serde(default)]
    pub discarded: bool,
}

impl FlatSeat {
    /// Место можно выбрать при покупке: доступно, не удалено, не проход.
    pub fn is_selectable(&self) -> bool {
        !self.discarded
            && self.status == SeatStatus::Available
            && self.seat_type_name.is_sellable()
    }
}
