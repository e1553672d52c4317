use crate::error::PublishError;
use crate::types::EncodedPayload;

/// Край доставки pipeline'а.
///
/// Publisher не перечисляет и не знает конкретных реализаций — клиент
/// message bus, TCP-соединение, файл, очередь в памяти — всё это просто
/// этот trait. Sink'и работают на blocking task и могут блокироваться.
pub trait MessageSink: Send {
    /// Вызывается один раз перед первым publish.
    fn open(&mut self) -> Result<(), PublishError> {
        Ok(())
    }

    /// Доставить один payload. Retry-политика, если она есть, живёт здесь
    /// — publisher не ретраит никогда.
    fn publish(&mut self, payload: &EncodedPayload) -> Result<(), PublishError>;

    /// Сбросить буферы. Вызывается после каждого batch'а и на shutdown.
    fn flush(&mut self) -> Result<(), PublishError> {
        Ok(())
    }
}
