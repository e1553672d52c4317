mod file;
mod memory;
mod tcp;

pub use file::{FileSink, read_frames};
pub use memory::{MemorySink, MemorySinkHandle};
pub use tcp::TcpSink;
