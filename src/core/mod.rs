//! Core logger types

pub mod channel;
pub mod config;
pub mod context;
pub mod error;
pub mod level;
pub mod log_record;
pub mod logger;
pub mod message;
pub mod metrics;
pub mod registry;

pub use channel::{Handler, Subscription, SubscriptionId};
pub use config::RegistryConfig;
pub use context::{ContextGuard, ExecutionContext, FieldValue};
pub use error::{LoggerError, Result};
pub use level::Level;
pub use log_record::{GeneratedTraceError, LogRecord, RecordError};
pub use logger::{Children, LevelChange, LogOptions, Logger, DEFAULT_LEVEL};
pub use message::{LogObject, Message};
pub use metrics::LoggerMetrics;
pub use registry::{validate_name, LoggerRegistry, RegistryBuilder};
