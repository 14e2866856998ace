pub mod sink;

pub use sink::{LogSink, MemorySink, MetadataSink};
