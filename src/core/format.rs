//! Console and file renderings of a log entry
//!
//! Both renderings carry the same fields in the same order:
//!
//! ```text
//! 2025-01-08 10:30:45.123  INFO 41235 src/main.rs:12                  : Server started
//! ```
//!
//! The console line colors the level, the process id and the call site,
//! whether or not stdout is a terminal. The file line never contains escape
//! sequences: anything that looks like an ANSI
//! CSI sequence in the call site or message is stripped before it is written.

use super::log_entry::LogEntry;
use colored::Color;
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// Timestamp layout shared by both renderings (local time, milliseconds).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Width the call site is padded to.
pub const CALL_SITE_WIDTH: usize = 30;

static ANSI_CSI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[[0-?]*[ -/]*[@-~]").expect("ANSI CSI pattern is valid")
});

/// Remove every ANSI CSI escape sequence from `input`.
pub fn strip_ansi(input: &str) -> Cow<'_, str> {
    ANSI_CSI.replace_all(input, "")
}

/// Wrap `text` in a foreground color and a reset.
///
/// Built by hand: `colored` drops its codes when stdout is not a terminal.
fn paint(text: &str, color: Color) -> String {
    format!("\x1b[{}m{}\x1b[0m", color.to_fg_str(), text)
}

/// Render the colorized line written to standard output.
pub fn console_line(entry: &LogEntry) -> String {
    let level = paint(&format!("{:>5}", entry.level()), entry.level().color());
    let pid = paint(&format!("{:>5}", entry.pid()), Color::Magenta);
    let call_site = paint(
        &format!("{:<width$}", entry.call_site(), width = CALL_SITE_WIDTH),
        Color::Green,
    );

    format!(
        "{} {} {} {} : {}",
        entry.timestamp().format(TIMESTAMP_FORMAT),
        level,
        pid,
        call_site,
        entry.message()
    )
}

/// Render the plain line handed to the file sink.
pub fn file_line(entry: &LogEntry) -> String {
    format!(
        "{} {:>5} {:>5} {:<width$} : {}",
        entry.timestamp().format(TIMESTAMP_FORMAT),
        entry.level(),
        entry.pid(),
        strip_ansi(entry.call_site()),
        strip_ansi(entry.message()),
        width = CALL_SITE_WIDTH
    )
}

/// Render a `file:line` call site for the given source location.
pub fn call_site(location: &std::panic::Location<'_>) -> String {
    format!("{}:{}", location.file(), location.line())
}
