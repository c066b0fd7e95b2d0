//! Basic logger usage example
//!
//! Demonstrates console logging and the level gate.
//!
//! Run with: cargo run --example basic_usage

use drain_logger::prelude::*;
use drain_logger::{info, warn};

fn main() -> Result<()> {
    println!("=== Drain Logger - Basic Usage Example ===\n");

    // Console-only: no file, no worker
    let logger = Logger::console();
    logger.set_level(LogLevel::Debug);

    println!("1. Logging at different levels:");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.warn("This is a warning message");
    logger.error("This is an error message");

    println!("\n2. Raising the minimum level:");
    logger.set_level(LogLevel::Warn);
    println!("   Minimum level set to WARN - debug and info won't show:");
    logger.debug("Debug message (hidden)");
    logger.info("Info message (hidden)");
    logger.warn("Warning message (visible)");

    println!("\n3. Macros format only enabled events:");
    let attempts = 3;
    info!(logger, "Attempt {} (hidden)", attempts);
    warn!(logger, "Retrying after {} attempts", attempts);
    warn!(logger, "100% literal text {}");

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
