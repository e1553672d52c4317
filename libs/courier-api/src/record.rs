use serde::{Deserialize, Serialize};

use crate::util::now_ms;

/// Универсальная публикуемая запись.
///
/// Доменные типы (Employee, Quote, ...) опускаются в этот носитель перед
/// кодированием. После создания не мутируется: создаётся вызывающим,
/// один раз потребляется encoder'ом и выбрасывается.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Timestamp в миллисекундах (Unix epoch).
    pub ts_ms: i64,
    /// Ключ партиционирования (имя сотрудника, symbol, ...).
    pub key: String,
    /// Структурированные данные записи; имена полей должны совпадать
    /// со схемой encoder'а.
    pub value: serde_json::Value,
}

impl Record {
    /// Создать запись с текущим временем.
    pub fn new(key: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            ts_ms: now_ms(),
            key: key.into(),
            value,
        }
    }

    /// Создать запись с явным timestamp.
    pub fn with_ts(ts_ms: i64, key: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            ts_ms,
            key: key.into(),
            value,
        }
    }
}
