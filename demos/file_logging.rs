//! File logging example
//!
//! Every line goes to the console immediately and to a daily rotating file
//! through the background worker.
//!
//! Run with: cargo run --example file_logging

use drain_logger::prelude::*;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Drain Logger - File Logging Example ===\n");

    let logger = Logger::builder()
        .path("logs/application.log")
        .level(LogLevel::Debug)
        .high_water_mark(100)
        .flush_interval(Duration::from_secs(1))
        .max_age_days(30)
        .build()?;

    println!("1. Logging to both console and file:");
    logger.info("Application started");
    logger.debug("Loading configuration...");
    logger.warn("Using default settings for some options");
    logger.error("Failed to load optional plugin");

    println!("\n2. Enough lines to trigger a high-water-mark flush:");
    for i in 1..=150 {
        if i % 50 == 0 {
            logger.info(format!("Processing item {}/150", i));
        } else {
            logger.log_at(LogLevel::Debug, "demo:batch", format!("item {}", i));
        }
    }

    println!("\n3. Shutting down:");
    let m = logger.metrics();
    println!("   logged: {}, enqueued: {}", m.logged(), m.enqueued());
    let clean = logger.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
    println!(
        "   clean shutdown: {}, flushes: {}, lines written: {}",
        clean,
        logger.metrics().flushes(),
        logger.metrics().flushed_lines()
    );

    let rotating = RotatingFileSink::new("logs/application.log")?;
    println!("   today's file: {}", rotating.current_path().display());

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
