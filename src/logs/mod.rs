// Logs module - Service log registry and bounded tail reads

mod buffer;
mod reader;
mod registry;

pub use buffer::RollingBuffer;
pub use reader::{read_tail, tail, LineCount, DEFAULT_LINES, MAX_LINES, MIN_LINES};
pub use registry::LogRegistry;

pub(crate) use registry::validate_services;
