//! Соглашение о подписях рядов и мест.
//!
//! Канонический вариант: ряд - буква (`A`, `B`, ...), место - номер с единицы.
//! Ряд с индексом `r` подписывается как символ `65 + r`; после `Z` идут
//! `AA`, `AB`, ... Обратный вариант (ряд - число, место - буква) включается
//! только явно и хранится в самой схеме, чтобы одна сетка никогда не смешивала оба.

use crate::models::Position;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelConvention {
    #[default]
    LetterRow,
    NumberRow,
}

impl LabelConvention {
    /// Разбор значения из конфигурации.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "letter-row" | "letter_row" | "letter" => Some(LabelConvention::LetterRow),
            "number-row" | "number_row" | "number" => Some(LabelConvention::NumberRow),
            _ => None,
        }
    }

    pub fn row_label(self, row: usize) -> String {
        match self {
            LabelConvention::LetterRow => letters(row),
            LabelConvention::NumberRow => (row + 1).to_string(),
        }
    }

    pub fn column_label(self, column: usize) -> String {
        match self {
            LabelConvention::LetterRow => (column + 1).to_string(),
            LabelConvention::NumberRow => letters(column),
        }
    }

    pub fn parse_row(self, label: &str) -> Option<usize> {
        match self {
            LabelConvention::LetterRow => parse_letters(label),
            LabelConvention::NumberRow => parse_number(label),
        }
    }

    pub fn parse_column(self, label: &str) -> Option<usize> {
        match self {
            LabelConvention::LetterRow => parse_number(label),
            LabelConvention::NumberRow => parse_letters(label),
        }
    }

    /// Подпись места целиком, например `B7`.
    pub fn seat_label(self, position: Position) -> String {
        format!(
            "{}{}",
            self.row_label(position.row),
            self.column_label(position.column)
        )
    }
}

/// Биективная запись по основанию 26: 0 -> A, 25 -> Z, 26 -> AA.
pub fn letters(index: usize) -> String {
    let mut n = index + 1;
    let mut out = Vec::new();
    while n > 0 {
        n -= 1;
        out.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

fn parse_letters(label: &str) -> Option<usize> {
    let label = label.trim();
    if label.is_empty() {
        return None;
    }
    let mut acc: usize = 0;
    for ch in label.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let digit = (ch.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        acc = acc.checked_mul(26)?.checked_add(digit)?;
    }
    Some(acc - 1)
}

fn parse_number(label: &str) -> Option<usize> {
    let label = label.trim();
    if label.is_empty() || !label.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let n: usize = label.parse().ok()?;
    n.checked_sub(1)
}
