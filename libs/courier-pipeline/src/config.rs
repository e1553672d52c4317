use serde::Deserialize;

use courier_api::OverflowPolicy;

use crate::PipelineError;

fn default_batch_messages() -> usize {
    100
}

fn default_batch_bytes() -> usize {
    1024 * 1024
}

fn default_batch_delay_ms() -> u64 {
    10
}

fn default_buffer() -> usize {
    64
}

fn default_overflow() -> OverflowPolicy {
    OverflowPolicy::BackPressure
}

/// Параметры доставки одного прогона publisher'а.
///
/// Batch уходит в sink когда набирает `batch_messages` payload'ов,
/// `batch_bytes` закодированных байт, либо когда его первый payload
/// старше `batch_delay_ms`. `buffer` — глубина bounded канала между
/// encode task и sink task; `overflow` — что делать, когда sink не
/// успевает.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PublisherConfig {
    pub batch_messages: usize,
    pub batch_bytes: usize,
    pub batch_delay_ms: u64,
    pub buffer: usize,
    pub overflow: OverflowPolicy,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            batch_messages: default_batch_messages(),
            batch_bytes: default_batch_bytes(),
            batch_delay_ms: default_batch_delay_ms(),
            buffer: default_buffer(),
            overflow: default_overflow(),
        }
    }
}

impl PublisherConfig {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.batch_messages == 0 {
            return Err(PipelineError::Config("batch_messages must be >= 1".into()));
        }
        if self.batch_bytes == 0 {
            return Err(PipelineError::Config("batch_bytes must be >= 1".into()));
        }
        if self.buffer == 0 {
            return Err(PipelineError::Config("buffer must be >= 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = PublisherConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.batch_messages, 100);
        assert_eq!(cfg.overflow, OverflowPolicy::BackPressure);
    }

    #[test]
    fn zero_batch_rejected() {
        let cfg = PublisherConfig {
            batch_messages: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
