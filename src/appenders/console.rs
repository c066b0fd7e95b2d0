//! Console output
//!
//! Every event is written with a single call on a locked handle, so lines
//! from concurrent threads never interleave within a line.

use std::io::{self, Write};

/// Where console lines go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleTarget {
    #[default]
    Stdout,
    /// Discard console output, for benchmarks and file-only setups
    Silent,
}

impl ConsoleTarget {
    /// Write `line` followed by a newline.
    ///
    /// Errors (a closed pipe, for instance) are ignored: console output is
    /// best effort and must never take the caller down.
    pub fn write_line(self, line: &str) {
        match self {
            ConsoleTarget::Stdout => {
                let mut buf = String::with_capacity(line.len() + 1);
                buf.push_str(line);
                buf.push('\n');
                let mut out = io::stdout().lock();
                let _ = out.write_all(buf.as_bytes());
                let _ = out.flush();
            }
            ConsoleTarget::Silent => {}
        }
    }
}
