use courier_api::PublishError;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("config: {0}")]
    Config(String),

    #[error("source ({publisher}): {source}")]
    Source { publisher: String, source: PublishError },

    #[error("encode ({publisher}): {source}")]
    Encode { publisher: String, source: PublishError },

    #[error("sink ({publisher}): {source}")]
    Sink { publisher: String, source: PublishError },

    #[error("task join: {0}")]
    Join(String),
}
