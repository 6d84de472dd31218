//! Basic logger usage example
//!
//! Demonstrates flat-mode logging through the global registry, level
//! filtering and lazy messages.
//!
//! Run with: cargo run --example basic_usage

use logger_hierarchy::prelude::*;
use logger_hierarchy::{fine, info};

fn main() -> Result<()> {
    println!("=== Logger Hierarchy - Basic Usage Example ===\n");

    let registry = LoggerRegistry::global();
    registry.root().subscribe_with(|record| println!("   {}", record));

    let logger = registry.get("app")?;

    println!("1. Logging at different levels (root level is INFO):");
    logger.finest("This is a finest message (hidden)");
    logger.fine("This is a fine message (hidden)");
    logger.config("This is a config message (hidden)");
    logger.info("This is an info message");
    logger.warning("This is a warning message");
    logger.severe("This is a severe message");
    logger.shout("This is a shout message");

    println!("\n2. Lowering the root level to ALL:");
    registry.root().set_level(Level::ALL)?;
    logger.finest("Finest message (visible)");
    fine!(logger, "Formatted fine message: {} + {} = {}", 2, 2, 4);

    println!("\n3. Lazy messages are not built when filtered:");
    registry.root().set_level(Level::WARNING)?;
    logger.info(Message::lazy(|| {
        println!("   (this never prints)");
        "expensive".to_string()
    }));
    info!(logger, "Also skipped: {}", "nothing formatted");
    logger.warning(Message::lazy(|| "Built on demand".to_string()));

    println!("\n4. Attaching an error:");
    let err = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml missing");
    logger.log_with(Level::SEVERE, "Startup failed", LogOptions::new().with_error(err));

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
