//! Logging macros for ergonomic log message formatting.
//!
//! The format arguments are wrapped in a deferred message, so nothing is
//! formatted when the logger filters the call out.
//!
//! # Examples
//!
//! ```
//! use logger_hierarchy::prelude::*;
//! use logger_hierarchy::info;
//!
//! let registry = LoggerRegistry::new();
//! let logger = registry.get("server").unwrap();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a formatted message at an explicit level.
///
/// # Examples
///
/// ```
/// # use logger_hierarchy::prelude::*;
/// # let registry = LoggerRegistry::new();
/// # let logger = registry.get("app").unwrap();
/// use logger_hierarchy::log;
/// log!(logger, Level::INFO, "Simple message");
/// log!(logger, Level::SEVERE, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, $crate::Message::lazy(|| format!($($arg)+)))
    };
}

/// Log a finest-level message.
///
/// # Examples
///
/// ```
/// # use logger_hierarchy::prelude::*;
/// # let registry = LoggerRegistry::new();
/// # let logger = registry.get("app").unwrap();
/// use logger_hierarchy::finest;
/// finest!(logger, "Entering function: calculate()");
/// ```
#[macro_export]
macro_rules! finest {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::FINEST, $($arg)+)
    };
}

/// Log a finer-level message.
#[macro_export]
macro_rules! finer {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::FINER, $($arg)+)
    };
}

/// Log a fine-level message.
///
/// # Examples
///
/// ```
/// # use logger_hierarchy::prelude::*;
/// # let registry = LoggerRegistry::new();
/// # let logger = registry.get("app").unwrap();
/// use logger_hierarchy::fine;
/// fine!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! fine {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::FINE, $($arg)+)
    };
}

/// Log a config-level message.
#[macro_export]
macro_rules! config {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::CONFIG, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use logger_hierarchy::prelude::*;
/// # let registry = LoggerRegistry::new();
/// # let logger = registry.get("app").unwrap();
/// use logger_hierarchy::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::INFO, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use logger_hierarchy::prelude::*;
/// # let registry = LoggerRegistry::new();
/// # let logger = registry.get("app").unwrap();
/// use logger_hierarchy::warning;
/// warning!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::WARNING, $($arg)+)
    };
}

/// Log a severe-level message.
#[macro_export]
macro_rules! severe {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::SEVERE, $($arg)+)
    };
}

/// Log a shout-level message.
///
/// # Examples
///
/// ```
/// # use logger_hierarchy::prelude::*;
/// # let registry = LoggerRegistry::new();
/// # let logger = registry.get("app").unwrap();
/// use logger_hierarchy::shout;
/// shout!(logger, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! shout {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::SHOUT, $($arg)+)
    };
}
