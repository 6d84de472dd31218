//! Hierarchical logging example
//!
//! Demonstrates per-logger levels, subscriptions on inner nodes, level-change
//! notifications, scoped context and JSON configuration.
//!
//! Run with: cargo run --example hierarchical_logging

use logger_hierarchy::prelude::*;

fn main() -> Result<()> {
    println!("=== Logger Hierarchy - Hierarchical Example ===\n");

    let registry = RegistryConfig::from_json(
        r#"{
            "hierarchical": true,
            "root_level": "INFO",
            "stack_trace_level": "SHOUT",
            "levels": { "svc.db": "FINE" }
        }"#,
    )?
    .build()?;

    let root_records = registry.root().subscribe();
    let db_records = registry.get("svc.db")?.subscribe();
    let level_changes = registry.get("svc.http")?.on_level_changed();

    let db = registry.get("svc.db")?;
    let http = registry.get("svc.http")?;

    println!("1. Effective levels:");
    for name in registry.names() {
        let logger = registry.get(&name)?;
        println!(
            "   {:<10} own={:<8} effective={}",
            if name.is_empty() { "<root>" } else { name.as_str() },
            logger.own_level().map_or("-".to_string(), |l| l.to_string()),
            logger.level()
        );
    }

    println!("\n2. Records bubble up to every ancestor:");
    db.fine("query plan cached");
    http.fine("hidden: svc.http inherits INFO");
    {
        let _request = ExecutionContext::scope("request_id", "r-42");
        http.info("GET /health");
    }

    println!("   root saw:");
    for record in root_records.try_iter() {
        println!("     {} {}", record, record.context());
    }
    println!("   svc.db saw:");
    for record in db_records.try_iter() {
        println!("     {}", record);
    }

    println!("\n3. Level-change notifications:");
    http.set_level(Level::FINEST)?;
    http.reset_level()?;
    for change in level_changes.try_iter() {
        println!("   {:?}", change);
    }

    println!("\n4. Stack traces above the capture threshold:");
    http.shout("connection pool exhausted");
    if let Some(record) = root_records.try_recv() {
        println!("   error: {}", record.error().map_or(String::new(), |e| e.to_string()));
        println!("   trace captured: {}", record.stack_trace().is_some());
        println!("\n   as JSON:\n{}", record.to_json_pretty()?);
    }

    println!("\n5. Detached loggers stay outside the tree:");
    let scratch = registry.detached("scratch");
    let scratch_records = scratch.subscribe();
    scratch.info("only scratch subscribers see this");
    println!(
        "   scratch got {}, root got {}",
        scratch_records.len(),
        root_records.len()
    );

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
