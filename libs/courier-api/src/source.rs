use crate::error::PublishError;
use crate::record::Record;

/// Pull-источник записей.
///
/// Publisher вычерпывает источник пока `next_record` не вернёт `Ok(None)`
/// (конец последовательности). Источники работают на blocking task, так
/// что реализациям можно блокироваться.
pub trait RecordSource: Send {
    /// Следующая запись, либо `Ok(None)` когда последовательность
    /// исчерпана.
    fn next_record(&mut self) -> Result<Option<Record>, PublishError>;

    /// Сколько записей ещё впереди, если известно.
    fn size_hint(&self) -> Option<u64> {
        None
    }
}

/// Источник поверх готового списка записей. В основном для тестов
/// и replay'я.
pub struct VecSource {
    records: std::vec::IntoIter<Record>,
}

impl VecSource {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records: records.into_iter(),
        }
    }
}

impl RecordSource for VecSource {
    fn next_record(&mut self) -> Result<Option<Record>, PublishError> {
        Ok(self.records.next())
    }

    fn size_hint(&self) -> Option<u64> {
        Some(self.records.len() as u64)
    }
}
