//! Logger registry: the namespace tree and its process-wide settings

use super::{
    error::{LoggerError, Result},
    level::Level,
    logger::{Logger, DEFAULT_LEVEL},
    metrics::LoggerMetrics,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Settings shared by every logger of one registry
#[derive(Debug)]
pub(crate) struct Shared {
    hierarchical: AtomicBool,
    stack_trace_level: RwLock<Level>,
    collect_metrics: AtomicBool,
    pub(crate) metrics: LoggerMetrics,
}

impl Shared {
    fn new(hierarchical: bool, stack_trace_level: Level, collect_metrics: bool) -> Self {
        Self {
            hierarchical: AtomicBool::new(hierarchical),
            stack_trace_level: RwLock::new(stack_trace_level),
            collect_metrics: AtomicBool::new(collect_metrics),
            metrics: LoggerMetrics::new(),
        }
    }

    #[inline]
    pub(crate) fn metrics_enabled(&self) -> bool {
        self.collect_metrics.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn is_hierarchical(&self) -> bool {
        self.hierarchical.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn stack_trace_level(&self) -> Level {
        *self.stack_trace_level.read()
    }
}

/// Check a dotted logger name; the empty string names the root
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Ok(());
    }
    if name.starts_with('.') {
        return Err(LoggerError::invalid_name(name, "name must not start with '.'"));
    }
    if name.ends_with('.') {
        return Err(LoggerError::invalid_name(name, "name must not end with '.'"));
    }
    if name.split('.').any(str::is_empty) {
        return Err(LoggerError::invalid_name(
            name,
            "name must not contain an empty segment",
        ));
    }
    Ok(())
}

/// Registry of named loggers.
///
/// Each dotted name maps to exactly one [`Logger`]; requesting a name creates
/// it and any missing ancestors. The root (empty name) exists from
/// construction.
///
/// # Example
///
/// ```
/// use logger_hierarchy::{Level, LoggerRegistry};
/// use std::sync::Arc;
///
/// let registry = LoggerRegistry::builder()
///     .hierarchical(true)
///     .root_level(Level::WARNING)
///     .build();
///
/// let db = registry.get("svc.db").unwrap();
/// assert!(Arc::ptr_eq(db.parent().unwrap(), &registry.get("svc").unwrap()));
/// assert_eq!(db.level(), Level::WARNING);
/// ```
pub struct LoggerRegistry {
    shared: Arc<Shared>,
    root: Arc<Logger>,
    loggers: RwLock<HashMap<String, Arc<Logger>>>,
}

impl LoggerRegistry {
    /// Create a registry in flat mode with an INFO root
    #[must_use]
    pub fn new() -> Self {
        RegistryBuilder::new().build()
    }

    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Process-wide registry, created on first use
    pub fn global() -> &'static LoggerRegistry {
        static GLOBAL: OnceLock<LoggerRegistry> = OnceLock::new();
        GLOBAL.get_or_init(LoggerRegistry::new)
    }

    pub fn root(&self) -> Arc<Logger> {
        Arc::clone(&self.root)
    }

    /// Get the logger for `name`, creating it and its ancestors if needed
    pub fn get(&self, name: &str) -> Result<Arc<Logger>> {
        validate_name(name)?;
        if let Some(logger) = self.loggers.read().get(name) {
            return Ok(Arc::clone(logger));
        }

        let mut loggers = self.loggers.write();
        Ok(self.get_or_create(&mut loggers, name))
    }

    fn get_or_create(&self, loggers: &mut HashMap<String, Arc<Logger>>, name: &str) -> Arc<Logger> {
        if let Some(logger) = loggers.get(name) {
            return Arc::clone(logger);
        }

        let (parent, simple_name) = match name.rfind('.') {
            Some(dot) => (self.get_or_create(loggers, &name[..dot]), &name[dot + 1..]),
            None => (Arc::clone(&self.root), name),
        };

        let logger = Arc::new(Logger::child(
            simple_name,
            Arc::clone(&parent),
            Arc::clone(&self.shared),
        ));
        parent.add_child(simple_name, &logger);
        loggers.insert(name.to_string(), Arc::clone(&logger));
        logger
    }

    /// Get an existing logger without creating it
    pub fn lookup(&self, name: &str) -> Option<Arc<Logger>> {
        self.loggers.read().get(name).cloned()
    }

    /// Create a logger outside the namespace tree.
    ///
    /// Detached loggers have no parent, never gain children, and are not
    /// shared: every call returns a new instance.
    pub fn detached(&self, name: impl Into<String>) -> Arc<Logger> {
        Arc::new(Logger::detached(name.into(), Arc::clone(&self.shared)))
    }

    /// Registered names, sorted; includes the root as `""`
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.loggers.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered loggers, including the root
    pub fn len(&self) -> usize {
        self.loggers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.read().is_empty()
    }

    pub fn is_hierarchical(&self) -> bool {
        self.shared.is_hierarchical()
    }

    /// Switch between per-node levels and subscriptions (`true`) and a single
    /// root-wide level and stream (`false`)
    pub fn set_hierarchical(&self, enabled: bool) {
        self.shared.hierarchical.store(enabled, Ordering::Release);
    }

    pub fn stack_trace_level(&self) -> Level {
        self.shared.stack_trace_level()
    }

    /// Capture a stack trace for calls at or above `level`; `Level::OFF` disables capture
    pub fn set_stack_trace_level(&self, level: Level) {
        *self.shared.stack_trace_level.write() = level;
    }

    /// Counters for this registry; they only move while collection is enabled
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.shared.metrics
    }

    pub fn collects_metrics(&self) -> bool {
        self.shared.metrics_enabled()
    }

    /// Turn counter updates on or off; off keeps the level gate free of shared writes
    pub fn set_collect_metrics(&self, enabled: bool) {
        self.shared.collect_metrics.store(enabled, Ordering::Relaxed);
    }
}

impl Default for LoggerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LoggerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerRegistry")
            .field("loggers", &self.len())
            .field("hierarchical", &self.is_hierarchical())
            .field("root_level", &self.root.level())
            .finish()
    }
}

/// Builder for constructing a LoggerRegistry with a fluent API
///
/// # Example
/// ```
/// use logger_hierarchy::prelude::*;
///
/// let registry = LoggerRegistry::builder()
///     .hierarchical(true)
///     .root_level(Level::FINE)
///     .stack_trace_level(Level::SEVERE)
///     .build();
/// assert_eq!(registry.root().level(), Level::FINE);
/// ```
#[derive(Debug, Clone)]
pub struct RegistryBuilder {
    hierarchical: bool,
    root_level: Level,
    stack_trace_level: Level,
    collect_metrics: bool,
}

impl RegistryBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            hierarchical: false,
            root_level: DEFAULT_LEVEL,
            stack_trace_level: Level::OFF,
            collect_metrics: false,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn hierarchical(mut self, enabled: bool) -> Self {
        self.hierarchical = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn root_level(mut self, level: Level) -> Self {
        self.root_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn stack_trace_level(mut self, level: Level) -> Self {
        self.stack_trace_level = level;
        self
    }

    /// Update `LoggerMetrics` on every call; disabled by default
    #[must_use = "builder methods return a new value"]
    pub fn collect_metrics(mut self, enabled: bool) -> Self {
        self.collect_metrics = enabled;
        self
    }

    /// Build the registry
    pub fn build(self) -> LoggerRegistry {
        let shared = Arc::new(Shared::new(
            self.hierarchical,
            self.stack_trace_level,
            self.collect_metrics,
        ));
        let root = Arc::new(Logger::root(Arc::clone(&shared), self.root_level));

        let mut loggers = HashMap::new();
        loggers.insert(String::new(), Arc::clone(&root));

        LoggerRegistry {
            shared,
            root,
            loggers: RwLock::new(loggers),
        }
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
