//! Output destinations

pub mod console;
pub mod memory;
pub mod rotating_file;

pub use console::ConsoleTarget;
pub use memory::MemorySink;
pub use rotating_file::{RotatingFileSink, DEFAULT_RETENTION_DAYS};

pub use crate::core::Sink;
