//! Process-wide logger example
//!
//! Installs a file-backed logger once, logs from several threads through the
//! free functions, then ends with a fatal event that drains the queue and
//! exits with status 1.
//!
//! Run with: cargo run --example global_logger

use drain_logger::{global, LogLevel, Logger, Result};
use std::thread;

fn main() -> Result<()> {
    global::info("Before installation: console only");

    let logger = Logger::new("logs/global.log")?;
    logger.set_level(LogLevel::Debug);
    assert!(global::set_logger(logger));

    // A second installation is refused
    assert!(!global::set_logger(Logger::console()));

    let workers: Vec<_> = (0..4)
        .map(|id| {
            thread::spawn(move || {
                for step in 0..5 {
                    global::debug(format!("worker {} step {}", id, step));
                }
                global::info(format!("worker {} done", id));
            })
        })
        .collect();
    for worker in workers {
        let _ = worker.join();
    }

    global::warn("All workers finished; shutting down hard");
    global::fatal("Demonstrating fatal drain")
}
