use courier_api::PublishError;

#[derive(Debug, thiserror::Error)]
pub enum GenError {
    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Publish(#[from] PublishError),

    #[error("{0}")]
    Pipeline(#[from] courier_pipeline::PipelineError),
}
