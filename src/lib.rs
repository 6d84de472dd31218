//! # Logger Hierarchy
//!
//! A hierarchical, level-filtered event logging core: named loggers arranged
//! in a dot-separated namespace tree, each publishing immutable log records
//! to any number of subscribers.
//!
//! ## Features
//!
//! - **Namespace Tree**: one logger per dotted name, ancestors created on demand
//! - **Two Modes**: per-node levels and streams, or a single root-wide level and stream
//! - **Lazy Messages**: deferred messages are only built when the level is enabled
//! - **Broadcast Delivery**: every subscriber receives every record, synchronously
//!
//! ## Example
//!
//! ```
//! use logger_hierarchy::prelude::*;
//!
//! let registry = LoggerRegistry::builder().hierarchical(true).build();
//! let db = registry.get("svc.db").unwrap();
//! let records = registry.root().subscribe();
//!
//! db.info("connected");
//! db.fine("ignored: below INFO");
//!
//! let record = records.try_recv().unwrap();
//! assert_eq!(record.logger_name(), "svc.db");
//! assert_eq!(record.message(), "connected");
//! assert!(records.try_recv().is_none());
//! ```

pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::core::{
        Children, ContextGuard, ExecutionContext, FieldValue, GeneratedTraceError, Level,
        LevelChange, LogObject, LogOptions, LogRecord, Logger, LoggerError, LoggerMetrics,
        LoggerRegistry, Message, RecordError, RegistryBuilder, RegistryConfig, Result,
        Subscription, SubscriptionId, DEFAULT_LEVEL,
    };
}

pub use crate::core::{
    validate_name, Children, ContextGuard, ExecutionContext, FieldValue, GeneratedTraceError,
    Handler, Level, LevelChange, LogObject, LogOptions, LogRecord, Logger, LoggerError,
    LoggerMetrics, LoggerRegistry, Message, RecordError, RegistryBuilder, RegistryConfig, Result,
    Subscription, SubscriptionId, DEFAULT_LEVEL,
};
