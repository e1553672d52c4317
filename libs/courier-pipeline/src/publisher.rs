use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use courier_api::{EncodedPayload, MessageSink, OverflowPolicy, RecordEncoder, RecordSource};

use crate::PipelineError;
use crate::config::PublisherConfig;

// ═══════════════════════════════════════════════════════════════
//  Publisher — source → encoder → batch → sink
// ═══════════════════════════════════════════════════════════════

/// Итог завершённого прогона publisher'а.
#[derive(Debug, Default, Clone, Copy)]
pub struct PublishStats {
    /// Payload'ов доставлено в sink.
    pub records: u64,
    /// Batch'ей доставлено в sink.
    pub batches: u64,
    /// Закодированных байт доставлено в sink.
    pub bytes: u64,
    /// Batch'ей дропнуто под OverflowPolicy::Drop.
    pub dropped: u64,
}

/// Generic publisher: вычерпывает RecordSource через внедрённый
/// RecordEncoder в MessageSink.
///
/// Два blocking task'а, соединённые bounded каналом: encode task тянет
/// записи, кодирует и копит batch'и; sink task доставляет каждый batch и
/// делает flush. Ошибки encode/source/sink прерывают прогон и
/// пробрасываются — здесь ничего не ретраится и не глотается. Batch'и,
/// отданные в sink до ошибки, остаются опубликованными.
pub struct Publisher {
    name: String,
    encoder: Arc<dyn RecordEncoder>,
    config: PublisherConfig,
}

impl Publisher {
    pub fn new(
        name: impl Into<String>,
        encoder: Arc<dyn RecordEncoder>,
        config: PublisherConfig,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self {
            name: name.into(),
            encoder,
            config,
        })
    }

    /// Вычерпать `source` в `sink` до конца последовательности или отмены.
    pub async fn run(
        &self,
        source: Box<dyn RecordSource>,
        sink: Box<dyn MessageSink>,
        token: CancellationToken,
    ) -> Result<PublishStats, PipelineError> {
        let (tx, rx) = mpsc::channel::<Vec<EncodedPayload>>(self.config.buffer);

        let sink_name = self.name.clone();
        let sink_task = tokio::task::spawn_blocking(move || run_sink(sink_name, sink, rx));

        let encode_name = self.name.clone();
        let encoder = self.encoder.clone();
        let config = self.config.clone();
        let encode_task = tokio::task::spawn_blocking(move || {
            run_encode(encode_name, source, encoder, config, tx, token)
        });

        let dropped = encode_task
            .await
            .map_err(|e| PipelineError::Join(e.to_string()))??;
        let mut stats = sink_task
            .await
            .map_err(|e| PipelineError::Join(e.to_string()))??;
        stats.dropped = dropped;

        tracing::info!(
            publisher = %self.name,
            records = stats.records,
            batches = stats.batches,
            bytes = stats.bytes,
            dropped = stats.dropped,
            "finished"
        );
        Ok(stats)
    }
}

// ═══════════════════════════════════════════════════════════════
//  Encode task — pull, encode, batch
// ═══════════════════════════════════════════════════════════════

fn run_encode(
    name: String,
    mut source: Box<dyn RecordSource>,
    encoder: Arc<dyn RecordEncoder>,
    config: PublisherConfig,
    tx: mpsc::Sender<Vec<EncodedPayload>>,
    token: CancellationToken,
) -> Result<u64, PipelineError> {
    let delay = Duration::from_millis(config.batch_delay_ms);
    // batch_messages = usize::MAX — легальная настройка "флашить только
    // по байтам/возрасту", поэтому преаллокация ограничена сверху
    let mut batch: Vec<EncodedPayload> = Vec::with_capacity(config.batch_messages.min(1024));
    let mut batch_bytes = 0usize;
    let mut batch_started = Instant::now();
    let mut dropped = 0u64;

    loop {
        if token.is_cancelled() {
            tracing::info!(publisher = %name, "cancelled");
            break;
        }

        let record = match source.next_record() {
            Ok(Some(record)) => record,
            Ok(None) => break,
            Err(e) => {
                return Err(PipelineError::Source {
                    publisher: name,
                    source: e,
                });
            }
        };

        let payload = encoder.encode(&record).map_err(|e| PipelineError::Encode {
            publisher: name.clone(),
            source: e,
        })?;

        if batch.is_empty() {
            batch_started = Instant::now();
        }
        batch_bytes += payload.len();
        batch.push(payload);

        let full = batch.len() >= config.batch_messages
            || batch_bytes >= config.batch_bytes
            || batch_started.elapsed() >= delay;
        if full && hand_off(&tx, &mut batch, &mut batch_bytes, &mut dropped, &config, &name).is_err()
        {
            // Sink-сторона умерла — её ошибка всплывёт из sink task.
            return Ok(dropped);
        }
    }

    if !batch.is_empty() {
        let _ = hand_off(&tx, &mut batch, &mut batch_bytes, &mut dropped, &config, &name);
    }
    Ok(dropped)
}

/// Передать полный batch в sink task с учётом overflow-политики.
///
/// `Err(())` значит канал закрыт (sink task завершился).
fn hand_off(
    tx: &mpsc::Sender<Vec<EncodedPayload>>,
    batch: &mut Vec<EncodedPayload>,
    batch_bytes: &mut usize,
    dropped: &mut u64,
    config: &PublisherConfig,
    name: &str,
) -> Result<(), ()> {
    let full = std::mem::replace(batch, Vec::with_capacity(config.batch_messages.min(1024)));
    *batch_bytes = 0;

    match config.overflow {
        OverflowPolicy::Drop => match tx.try_send(full) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => {
                *dropped += 1;
                tracing::warn!(publisher = %name, "channel full, dropping batch");
                Ok(())
            }
            Err(mpsc::error::TrySendError::Closed(_)) => Err(()),
        },
        OverflowPolicy::BackPressure => tx.blocking_send(full).map_err(|_| ()),
    }
}

// ═══════════════════════════════════════════════════════════════
//  Sink task — deliver batches
// ═══════════════════════════════════════════════════════════════

fn run_sink(
    name: String,
    mut sink: Box<dyn MessageSink>,
    mut rx: mpsc::Receiver<Vec<EncodedPayload>>,
) -> Result<PublishStats, PipelineError> {
    sink.open().map_err(|e| PipelineError::Sink {
        publisher: name.clone(),
        source: e,
    })?;

    let mut stats = PublishStats::default();
    while let Some(batch) = rx.blocking_recv() {
        for payload in &batch {
            sink.publish(payload).map_err(|e| PipelineError::Sink {
                publisher: name.clone(),
                source: e,
            })?;
            stats.bytes += payload.len() as u64;
        }
        sink.flush().map_err(|e| PipelineError::Sink {
            publisher: name.clone(),
            source: e,
        })?;
        stats.records += batch.len() as u64;
        stats.batches += 1;
        tracing::debug!(publisher = %name, size = batch.len(), "batch published");
    }
    Ok(stats)
}
