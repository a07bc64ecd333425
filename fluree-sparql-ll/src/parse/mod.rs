//! Table-driven parsing: the driver and the events it emits.

pub mod driver;
pub mod event;

pub use driver::Parser;
pub use event::{EventCollector, NullSink, ParseEvent, ParseSink, TraceSink, TRACE_TARGET};
