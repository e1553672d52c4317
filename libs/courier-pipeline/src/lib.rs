pub mod config;
pub mod error;
pub mod framing;
pub mod sinks;
mod publisher;

pub use config::PublisherConfig;
pub use error::PipelineError;
pub use publisher::{PublishStats, Publisher};
