//! In-memory sink
//!
//! Records every flushed block. Clones share the same storage, so a test can
//! hand one clone to a logger and inspect the other.

use crate::core::error::Result;
use crate::core::sink::Sink;
use parking_lot::Mutex;
use std::sync::Arc;

/// # Example
///
/// ```
/// use drain_logger::appenders::MemorySink;
/// use drain_logger::core::Sink;
///
/// let sink = MemorySink::new();
/// let mut writer = sink.clone();
/// writer.append(b"a\nb\n").unwrap();
///
/// assert_eq!(sink.block_count(), 1);
/// assert_eq!(sink.lines(), vec!["a", "b"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    blocks: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every block appended so far, in order
    pub fn blocks(&self) -> Vec<String> {
        self.blocks.lock().clone()
    }

    pub fn block_count(&self) -> usize {
        self.blocks.lock().len()
    }

    /// All persisted lines across blocks, in order
    pub fn lines(&self) -> Vec<String> {
        self.blocks
            .lock()
            .iter()
            .flat_map(|block| block.lines().map(String::from).collect::<Vec<_>>())
            .collect()
    }
}

impl Sink for MemorySink {
    fn append(&mut self, block: &[u8]) -> Result<()> {
        self.blocks
            .lock()
            .push(String::from_utf8_lossy(block).into_owned());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
