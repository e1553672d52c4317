pub mod encoder;
pub mod error;
pub mod record;
pub mod sink;
pub mod source;
pub mod types;
pub mod util;

pub use encoder::RecordEncoder;
pub use error::{ErrorKind, PublishError};
pub use record::Record;
pub use sink::MessageSink;
pub use source::{RecordSource, VecSource};
pub use types::{DataFormat, EncodedPayload, OverflowPolicy};
pub use util::now_ms;
