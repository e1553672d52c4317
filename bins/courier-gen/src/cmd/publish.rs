use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use codec_avro::AvroEncoder;
use courier_api::{EncodedPayload, MessageSink, PublishError};
use courier_pipeline::Publisher;
use courier_pipeline::sinks::{FileSink, TcpSink};

use super::config::{Effective, SinkConfig};
use super::domain::{EMPLOYEE_SCHEMA, RandomEmployeeSource};
use super::error::GenError;

// ═══════════════════════════════════════════════════════════════
//  Sink assembly
// ═══════════════════════════════════════════════════════════════

/// Fan-out обёртка: каждый payload уходит в каждый настроенный sink.
struct MultiSink {
    sinks: Vec<Box<dyn MessageSink>>,
}

impl MessageSink for MultiSink {
    fn open(&mut self) -> Result<(), PublishError> {
        for sink in &mut self.sinks {
            sink.open()?;
        }
        Ok(())
    }

    fn publish(&mut self, payload: &EncodedPayload) -> Result<(), PublishError> {
        for sink in &mut self.sinks {
            sink.publish(payload)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), PublishError> {
        for sink in &mut self.sinks {
            sink.flush()?;
        }
        Ok(())
    }
}

fn build_sink(cfg: &SinkConfig) -> Box<dyn MessageSink> {
    match cfg {
        SinkConfig::Tcp {
            host,
            port,
            max_payload,
        } => Box::new(TcpSink::new(host, *port, *max_payload)),
        SinkConfig::File { path } => Box::new(FileSink::new(path)),
    }
}

// ═══════════════════════════════════════════════════════════════
//  Run
// ═══════════════════════════════════════════════════════════════

pub async fn run(args: &Effective) -> Result<(), GenError> {
    let encoder = match &args.schema {
        Some(path) => AvroEncoder::from_file(path)?,
        None => AvroEncoder::parse(EMPLOYEE_SCHEMA)?,
    };

    let mut sinks: Vec<Box<dyn MessageSink>> = args.sinks.iter().map(build_sink).collect();
    let sink: Box<dyn MessageSink> = if sinks.len() == 1 {
        sinks.remove(0)
    } else {
        Box::new(MultiSink { sinks })
    };

    let source = RandomEmployeeSource::new(args.count, args.seed);
    let publisher = Publisher::new("courier-gen", Arc::new(encoder), args.publisher.clone())?;

    let token = CancellationToken::new();
    let ctrl_c_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("ctrl-c, shutting down");
            ctrl_c_token.cancel();
        }
    });

    tracing::info!(count = args.count, sinks = args.sinks.len(), "publishing employees");
    let stats = publisher.run(Box::new(source), sink, token).await?;
    tracing::info!(
        records = stats.records,
        batches = stats.batches,
        bytes = stats.bytes,
        "publish complete"
    );
    Ok(())
}
