use crate::error::PublishError;
use crate::record::Record;
use crate::types::{DataFormat, EncodedPayload};

/// Encoder запись → байты; capability, внедряемая в publisher.
///
/// Контракт: `encode` либо выдаёт один полный payload, либо падает без
/// payload'а вообще. Реализации не держат мутабельного состояния, поэтому
/// независимые вызовы encode безопасно параллелятся.
pub trait RecordEncoder: Send + Sync {
    /// Закодировать ровно одну запись в непрозрачный payload.
    fn encode(&self, record: &Record) -> Result<EncodedPayload, PublishError>;

    /// Формат, который выдаёт этот encoder.
    fn format(&self) -> DataFormat;
}
