//! Property-based tests for drain_logger using proptest

use drain_logger::core::format::{console_line, file_line, strip_ansi};
use drain_logger::prelude::*;
use proptest::prelude::*;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warn),
        Just(LogLevel::Error),
        Just(LogLevel::Fatal),
    ]
}

/// Text interleaved with CSI sequences such as `ESC[1;31m`
fn text_with_escapes() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "[a-zA-Z0-9 %{}:.]{0,12}",
            "\x1b\\[[0-9;]{0,6}[mKHJ]",
        ],
        0..8,
    )
    .prop_map(|parts| parts.concat())
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// The gate lets an event through exactly when threshold <= severity
    #[test]
    fn test_level_gate_matches_numeric_order(threshold in any_level(), severity in any_level()) {
        prop_assert_eq!(
            LogLevel::enabled(threshold, severity),
            (threshold as u8) <= (severity as u8)
        );
        prop_assert_eq!(threshold.allows(severity), threshold <= severity);
    }

    #[test]
    fn test_log_level_str_roundtrip(level in any_level()) {
        let parsed: LogLevel = level.to_str().parse().unwrap();
        prop_assert_eq!(level, parsed);
    }

    /// Test that parsing accepts case-insensitive input
    #[test]
    fn test_log_level_case_insensitive(level in any_level(), use_lower in any::<bool>()) {
        let input = if use_lower {
            level.to_str().to_lowercase()
        } else {
            level.to_str().to_string()
        };
        prop_assert_eq!(input.parse::<LogLevel>(), Ok(level));
    }
}

// ============================================================================
// Formatter Tests
// ============================================================================

proptest! {
    #[test]
    fn test_strip_ansi_leaves_no_escape(input in text_with_escapes()) {
        prop_assert!(!strip_ansi(&input).contains('\x1b'));
    }

    #[test]
    fn test_strip_ansi_keeps_plain_text(input in "[a-zA-Z0-9 %{}:.]*") {
        prop_assert_eq!(strip_ansi(&input), input.as_str());
    }

    /// Persisted lines carry no escapes and stay on one line
    #[test]
    fn test_file_line_is_single_plain_line(
        level in any_level(),
        call_site in text_with_escapes(),
        message in text_with_escapes(),
        newline in any::<bool>(),
    ) {
        let message = if newline { format!("{}\nforged", message) } else { message };
        let entry = LogEntry::new(level, call_site, message);
        let line = file_line(&entry);

        prop_assert!(!line.contains('\x1b'));
        prop_assert_eq!(line.lines().count(), 1);
        let level_field = format!(" {:>5} ", level);
        prop_assert!(line.contains(&level_field));
    }

    #[test]
    fn test_console_line_keeps_message(level in any_level(), message in "[a-zA-Z0-9 ]{1,40}") {
        let entry = LogEntry::new(level, "src/lib.rs:1", message.clone());
        let console = console_line(&entry);
        let suffix = format!(" : {}", message);
        prop_assert!(console.ends_with(&suffix));
    }
}
