//! Log record structure

use super::context::ExecutionContext;
use super::level::Level;
use super::message::LogObject;
use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::backtrace::Backtrace;
use std::error::Error;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Error value attached to a record
pub type RecordError = Arc<dyn Error + Send + Sync + 'static>;

static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Placeholder error paired with an automatically captured stack trace
#[derive(Debug, Clone, thiserror::Error)]
#[error("autogenerated stack trace for {level} {message}")]
pub struct GeneratedTraceError {
    pub level: Level,
    pub message: String,
}

/// Immutable snapshot of one logging event
#[derive(Debug)]
pub struct LogRecord {
    level: Level,
    message: String,
    object: Option<Arc<dyn LogObject>>,
    logger_name: String,
    error: Option<RecordError>,
    stack_trace: Option<Arc<Backtrace>>,
    context: ExecutionContext,
    created_at: DateTime<Utc>,
    sequence: u64,
}

impl LogRecord {
    /// Build a record, assigning the next sequence number and the current time
    pub fn new(
        level: Level,
        message: String,
        logger_name: impl Into<String>,
        context: ExecutionContext,
    ) -> Self {
        Self {
            level,
            message,
            object: None,
            logger_name: logger_name.into(),
            error: None,
            stack_trace: None,
            context,
            created_at: Utc::now(),
            sequence: NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn with_object(mut self, object: Option<Arc<dyn LogObject>>) -> Self {
        self.object = object;
        self
    }

    pub fn with_error(mut self, error: Option<RecordError>) -> Self {
        self.error = error;
        self
    }

    pub fn with_stack_trace(mut self, stack_trace: Option<Arc<Backtrace>>) -> Self {
        self.stack_trace = stack_trace;
        self
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Raw payload when the message was not a string
    pub fn object(&self) -> Option<&Arc<dyn LogObject>> {
        self.object.as_ref()
    }

    /// Downcast the raw payload to a concrete type
    pub fn object_as<T: 'static>(&self) -> Option<&T> {
        self.object
            .as_deref()
            .and_then(|object| object.as_any().downcast_ref::<T>())
    }

    /// Full dotted name of the logger that created the record
    pub fn logger_name(&self) -> &str {
        &self.logger_name
    }

    pub fn error(&self) -> Option<&RecordError> {
        self.error.as_ref()
    }

    pub fn stack_trace(&self) -> Option<&Backtrace> {
        self.stack_trace.as_deref()
    }

    pub fn context(&self) -> &ExecutionContext {
        &self.context
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Process-wide construction order
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Convert to a single-line JSON string
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Convert to pretty-printed JSON
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.level, self.logger_name, self.message)
    }
}

impl Serialize for LogRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("LogRecord", 9)?;
        state.serialize_field("sequence", &self.sequence)?;
        state.serialize_field("timestamp", &self.created_at)?;
        state.serialize_field("level", &self.level)?;
        state.serialize_field("level_value", &self.level.value())?;
        state.serialize_field("logger", &self.logger_name)?;
        state.serialize_field("message", &self.message)?;
        match &self.error {
            Some(error) => state.serialize_field("error", &error.to_string())?,
            None => state.skip_field("error")?,
        }
        match &self.stack_trace {
            Some(trace) => state.serialize_field("stack_trace", &trace.to_string())?,
            None => state.skip_field("stack_trace")?,
        }
        state.serialize_field("context", &self.context)?;
        state.end()
    }
}
