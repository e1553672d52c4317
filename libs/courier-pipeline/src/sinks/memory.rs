use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use courier_api::{EncodedPayload, MessageSink, PublishError};

fn default_max_payloads() -> usize {
    100_000
}

/// In-memory ring-buffer sink. Для тестов и локальных прогонов без
/// транспорта: держит последние `max_payloads` payload'ов, вытесняя
/// старейшие первыми.
pub struct MemorySink {
    shared: Arc<Mutex<VecDeque<EncodedPayload>>>,
    max_payloads: usize,
}

impl MemorySink {
    pub fn new(max_payloads: usize) -> Self {
        Self {
            shared: Arc::new(Mutex::new(VecDeque::with_capacity(max_payloads.min(65536)))),
            max_payloads,
        }
    }

    /// Handle для просмотра опубликованного после того, как sink отдан
    /// publisher'у.
    pub fn handle(&self) -> MemorySinkHandle {
        MemorySinkHandle {
            shared: self.shared.clone(),
        }
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new(default_max_payloads())
    }
}

impl MessageSink for MemorySink {
    fn publish(&mut self, payload: &EncodedPayload) -> Result<(), PublishError> {
        let mut buf = self.shared.lock().unwrap_or_else(PoisonError::into_inner);
        if buf.len() >= self.max_payloads {
            buf.pop_front();
        }
        buf.push_back(payload.clone());
        Ok(())
    }
}

#[derive(Clone)]
pub struct MemorySinkHandle {
    shared: Arc<Mutex<VecDeque<EncodedPayload>>>,
}

impl MemorySinkHandle {
    pub fn len(&self) -> usize {
        self.shared
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Копия всего опубликованного, старейшие первыми.
    pub fn snapshot(&self) -> Vec<EncodedPayload> {
        self.shared
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// Забрать всё опубликованное, оставив sink пустым.
    pub fn drain(&self) -> Vec<EncodedPayload> {
        self.shared
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_api::DataFormat;

    #[test]
    fn evicts_oldest_at_capacity() {
        let mut sink = MemorySink::new(2);
        let handle = sink.handle();
        for i in 0..3u8 {
            sink.publish(&EncodedPayload::new(vec![i], DataFormat::Raw))
                .unwrap();
        }
        let payloads = handle.drain();
        assert_eq!(payloads.len(), 2);
        assert_eq!(payloads[0].as_bytes(), &[1]);
        assert_eq!(payloads[1].as_bytes(), &[2]);
        assert!(handle.is_empty());
    }
}
