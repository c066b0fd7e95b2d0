//! Sink trait for persisted log output

use super::error::Result;

/// Durable append target for flushed blocks of log lines.
///
/// Each call to [`append`](Sink::append) receives one complete block: the
/// pending lines of a flush, newline-terminated. Sinks are owned by the drain
/// worker and only ever called from its thread.
///
/// # Example
///
/// ```
/// use drain_logger::core::{Result, Sink};
///
/// struct CountingSink(usize);
///
/// impl Sink for CountingSink {
///     fn append(&mut self, block: &[u8]) -> Result<()> {
///         self.0 += block.len();
///         Ok(())
///     }
///
///     fn flush(&mut self) -> Result<()> {
///         Ok(())
///     }
///
///     fn name(&self) -> &str {
///         "counting"
///     }
/// }
/// ```
pub trait Sink: Send {
    fn append(&mut self, block: &[u8]) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn append(&mut self, block: &[u8]) -> Result<()> {
        (**self).append(block)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
