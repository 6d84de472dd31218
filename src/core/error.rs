//! Error types for the logger hierarchy

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Logger name with an empty dot-delimited segment
    #[error("Invalid logger name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// Level change not permitted in the current mode
    #[error("Unsupported level change on logger '{logger}': {reason}")]
    UnsupportedMutation { logger: String, reason: &'static str },

    /// Channel reconfigured from inside its own delivery
    #[error("Logger '{logger}' cannot be reconfigured while it is delivering an event")]
    ReentrantConfiguration { logger: String },

    /// Level name that does not match a canonical level
    #[error("Invalid log level: '{0}'")]
    UnknownLevel(String),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl LoggerError {
    /// Create an invalid name error
    pub fn invalid_name(name: impl Into<String>, reason: &'static str) -> Self {
        LoggerError::InvalidName {
            name: name.into(),
            reason,
        }
    }

    /// Create an unsupported mutation error
    pub fn unsupported(logger: impl Into<String>, reason: &'static str) -> Self {
        LoggerError::UnsupportedMutation {
            logger: logger.into(),
            reason,
        }
    }

    /// Create a reentrant configuration error
    pub fn reentrant(logger: impl Into<String>) -> Self {
        LoggerError::ReentrantConfiguration {
            logger: logger.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }
}
