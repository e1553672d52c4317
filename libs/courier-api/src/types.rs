use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════
//  Overflow Policy
// ════════════════════════════════════════════════════════════════

/// Стратегия поведения при переполнении bounded канала.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// try_send(): если канал полон — дропнуть batch, залогировать.
    Drop,
    /// blocking_send(): ждать пока появится место (back-pressure).
    #[serde(alias = "backpressure")]
    BackPressure,
}

// ════════════════════════════════════════════════════════════════
//  Data Format
// ════════════════════════════════════════════════════════════════

/// Заявленный формат байтов в EncodedPayload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DataFormat {
    #[default]
    Avro,
    Json,
    Raw,
}

impl std::fmt::Display for DataFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataFormat::Avro => write!(f, "avro"),
            DataFormat::Json => write!(f, "json"),
            DataFormat::Raw => write!(f, "raw"),
        }
    }
}

// ════════════════════════════════════════════════════════════════
//  EncodedPayload
// ════════════════════════════════════════════════════════════════

/// Непрозрачный бинарный payload с метаданными формата.
///
/// Создаётся RecordEncoder'ом ровно из одного Record, проходит pipeline и
/// отдаётся в sink как есть. Pipeline и transport байты не интерпретируют
/// — вместе с ними едет только заявленный формат.
#[derive(Clone, Debug)]
pub struct EncodedPayload {
    bytes: Vec<u8>,
    format: DataFormat,
}

impl EncodedPayload {
    /// Создать payload с явно заявленным форматом.
    pub fn new(bytes: Vec<u8>, format: DataFormat) -> Self {
        Self { bytes, format }
    }

    /// Сырые байты.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Забрать внутренний Vec<u8>.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Заявленный формат.
    pub fn format(&self) -> DataFormat {
        self.format
    }

    /// Длина payload в байтах.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
