//! Logger node and dispatcher

use super::{
    channel::{Broadcast, Subscription, SubscriptionId},
    context::ExecutionContext,
    error::{LoggerError, Result},
    level::Level,
    log_record::{GeneratedTraceError, LogRecord, RecordError},
    message::Message,
    registry::Shared,
};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::backtrace::Backtrace;
use std::collections::{btree_map, BTreeMap};
use std::error::Error;
use std::fmt;
use std::sync::{Arc, Weak};

/// Level used by nodes without a parent until one is assigned
pub const DEFAULT_LEVEL: Level = Level::INFO;

type RecordChannel = Broadcast<Arc<LogRecord>>;
type LevelChannel = Broadcast<LevelChange>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    Root,
    Child,
    Detached,
}

/// Emitted on a logger's level-change stream after its own level changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelChange {
    /// Full name of the logger whose level changed
    pub logger: String,
    /// New own level; `None` when reset to inherit
    pub level: Option<Level>,
}

/// Optional parts of a log call
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    error: Option<RecordError>,
    stack_trace: Option<Arc<Backtrace>>,
    context: Option<ExecutionContext>,
}

impl LogOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an error to the record
    #[must_use = "builder methods return a new value"]
    pub fn with_error<E>(mut self, error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.error = Some(Arc::new(error));
        self
    }

    /// Attach an already shared error
    #[must_use = "builder methods return a new value"]
    pub fn with_shared_error(mut self, error: RecordError) -> Self {
        self.error = Some(error);
        self
    }

    /// Attach an explicit stack trace; suppresses automatic capture
    #[must_use = "builder methods return a new value"]
    pub fn with_stack_trace(mut self, stack_trace: Backtrace) -> Self {
        self.stack_trace = Some(Arc::new(stack_trace));
        self
    }

    /// Use this context instead of capturing the caller's
    #[must_use = "builder methods return a new value"]
    pub fn with_context(mut self, context: ExecutionContext) -> Self {
        self.context = Some(context);
        self
    }
}

/// Read-only snapshot of a logger's children, keyed by simple name
#[derive(Clone, Default)]
pub struct Children {
    entries: BTreeMap<String, Arc<Logger>>,
}

impl Children {
    pub fn get(&self, name: &str) -> Option<&Arc<Logger>> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Arc<Logger>> {
        self.entries.iter()
    }
}

impl fmt::Debug for Children {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.keys()).finish()
    }
}

/// A named vertex of the logger namespace tree.
///
/// Obtained from [`LoggerRegistry::get`](crate::LoggerRegistry::get) (one
/// instance per dotted name) or [`LoggerRegistry::detached`](crate::LoggerRegistry::detached).
pub struct Logger {
    name: String,
    full_name: String,
    parent: Option<Arc<Logger>>,
    children: RwLock<BTreeMap<String, Weak<Logger>>>,
    level: RwLock<Option<Level>>,
    records: Mutex<Option<Arc<RecordChannel>>>,
    level_changes: Mutex<Option<Arc<LevelChannel>>>,
    kind: NodeKind,
    shared: Arc<Shared>,
}

impl Logger {
    pub(crate) fn root(shared: Arc<Shared>, level: Level) -> Self {
        Self::build(String::new(), String::new(), None, Some(level), NodeKind::Root, shared)
    }

    pub(crate) fn child(name: &str, parent: Arc<Logger>, shared: Arc<Shared>) -> Self {
        let full_name = if parent.is_root() {
            name.to_string()
        } else {
            format!("{}.{}", parent.full_name, name)
        };
        Self::build(name.to_string(), full_name, Some(parent), None, NodeKind::Child, shared)
    }

    pub(crate) fn detached(name: String, shared: Arc<Shared>) -> Self {
        Self::build(name.clone(), name, None, None, NodeKind::Detached, shared)
    }

    fn build(
        name: String,
        full_name: String,
        parent: Option<Arc<Logger>>,
        level: Option<Level>,
        kind: NodeKind,
        shared: Arc<Shared>,
    ) -> Self {
        Self {
            name,
            full_name,
            parent,
            children: RwLock::new(BTreeMap::new()),
            level: RwLock::new(level),
            records: Mutex::new(None),
            level_changes: Mutex::new(None),
            kind,
            shared,
        }
    }

    pub(crate) fn add_child(&self, name: &str, child: &Arc<Logger>) {
        self.children
            .write()
            .insert(name.to_string(), Arc::downgrade(child));
    }

    /// Segment after the last dot
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dotted path from the root; empty for the root itself
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn parent(&self) -> Option<&Arc<Logger>> {
        self.parent.as_ref()
    }

    pub fn children(&self) -> Children {
        let entries = self
            .children
            .read()
            .iter()
            .filter_map(|(name, child)| child.upgrade().map(|child| (name.clone(), child)))
            .collect();
        Children { entries }
    }

    pub fn is_root(&self) -> bool {
        self.kind == NodeKind::Root
    }

    pub fn is_detached(&self) -> bool {
        self.kind == NodeKind::Detached
    }

    /// Level assigned to this node, `None` when inheriting
    pub fn own_level(&self) -> Option<Level> {
        *self.level.read()
    }

    fn root_node(&self) -> &Logger {
        let mut node = self;
        while let Some(parent) = &node.parent {
            node = parent.as_ref();
        }
        node
    }

    /// Effective level used to gate this logger's calls.
    ///
    /// Resolved on every call: nodes without a parent use their own level;
    /// otherwise flat mode uses the root's level and hierarchical mode uses
    /// the nearest level assigned along the parent chain.
    pub fn level(&self) -> Level {
        if self.parent.is_none() {
            return self.own_level().unwrap_or(DEFAULT_LEVEL);
        }
        if !self.shared.is_hierarchical() {
            return self.root_node().level();
        }

        let mut node = self;
        loop {
            if let Some(level) = node.own_level() {
                return level;
            }
            match &node.parent {
                Some(parent) => node = parent.as_ref(),
                None => return DEFAULT_LEVEL,
            }
        }
    }

    /// Whether a call at `level` would produce a record
    #[inline]
    pub fn is_loggable(&self, level: Level) -> bool {
        level >= self.level()
    }

    /// Assign this node's own level.
    ///
    /// Nodes other than the root and detached loggers only accept a level
    /// while hierarchical logging is enabled.
    pub fn set_level(&self, level: Level) -> Result<()> {
        self.assign_level(Some(level))
    }

    /// Clear the own level so the node inherits again
    pub fn reset_level(&self) -> Result<()> {
        self.assign_level(None)
    }

    fn assign_level(&self, level: Option<Level>) -> Result<()> {
        match self.kind {
            NodeKind::Child if !self.shared.is_hierarchical() => {
                return Err(LoggerError::unsupported(
                    &self.full_name,
                    "only the root logger has a level while hierarchical logging is disabled",
                ));
            }
            NodeKind::Root | NodeKind::Detached if level.is_none() => {
                return Err(LoggerError::unsupported(
                    &self.full_name,
                    "root and detached loggers require a concrete level",
                ));
            }
            _ => {}
        }
        if self.is_delivering() {
            return Err(LoggerError::reentrant(&self.full_name));
        }

        let previous = std::mem::replace(&mut *self.level.write(), level);
        if previous != level {
            let channel = self.level_changes.lock().clone();
            if let Some(channel) = channel {
                channel.publish(&LevelChange {
                    logger: self.full_name.clone(),
                    level,
                });
            }
        }
        Ok(())
    }

    fn is_delivering(&self) -> bool {
        let records = self.records.lock().clone();
        let level_changes = self.level_changes.lock().clone();
        records.is_some_and(|channel| channel.is_firing())
            || level_changes.is_some_and(|channel| channel.is_firing())
    }

    /// Stream of this node's own level changes
    pub fn on_level_changed(&self) -> Subscription<LevelChange> {
        self.level_channel().subscribe()
    }

    /// Invoke `handler` synchronously after each own level change
    pub fn on_level_changed_with<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&LevelChange) + Send + Sync + 'static,
    {
        self.level_channel().subscribe_with(Arc::new(handler))
    }

    fn level_channel(&self) -> Arc<LevelChannel> {
        Arc::clone(
            self.level_changes
                .lock()
                .get_or_insert_with(|| Arc::new(Broadcast::new())),
        )
    }

    /// Node whose record channel this node publishes to and subscribes on
    fn channel_owner(&self) -> &Logger {
        if self.kind == NodeKind::Child && !self.shared.is_hierarchical() {
            self.root_node()
        } else {
            self
        }
    }

    fn record_channel(&self) -> Arc<RecordChannel> {
        Arc::clone(
            self.records
                .lock()
                .get_or_insert_with(|| Arc::new(Broadcast::new())),
        )
    }

    /// Subscribe to the records this logger receives.
    ///
    /// While hierarchical logging is disabled, subscribing on any node other
    /// than the root or a detached logger attaches to the root's stream. The
    /// returned subscription stays attached to that stream even if
    /// hierarchical logging is enabled later; subscribe again to listen on
    /// the node itself.
    pub fn subscribe(&self) -> Subscription<Arc<LogRecord>> {
        self.channel_owner().record_channel().subscribe()
    }

    /// Invoke `handler` synchronously, on the logging thread, for every record
    pub fn subscribe_with<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&Arc<LogRecord>) + Send + Sync + 'static,
    {
        self.channel_owner()
            .record_channel()
            .subscribe_with(Arc::new(handler))
    }

    /// Remove one listener; returns whether it was found
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let channel = self.channel_owner().records.lock().clone();
        channel.is_some_and(|channel| channel.unsubscribe(id))
    }

    pub fn subscriber_count(&self) -> usize {
        let channel = self.channel_owner().records.lock().clone();
        channel.map_or(0, |channel| channel.listener_count())
    }

    /// Close the record stream and drop every listener.
    ///
    /// Open subscriptions end once drained; later subscribers get a fresh stream.
    pub fn clear_subscriptions(&self) -> Result<()> {
        let owner = self.channel_owner();
        let channel = {
            let mut slot = owner.records.lock();
            if slot.as_ref().is_some_and(|channel| channel.is_firing()) {
                return Err(LoggerError::reentrant(&owner.full_name));
            }
            slot.take()
        };
        // Listeners are released outside the slot lock
        if let Some(channel) = channel {
            channel.close();
        }
        Ok(())
    }

    /// Log `message` at `level`
    pub fn log<'a>(&self, level: Level, message: impl Into<Message<'a>>) {
        self.log_with(level, message, LogOptions::default());
    }

    /// Log with an optional error, stack trace or context.
    ///
    /// Nothing is evaluated or allocated when `level` is filtered out: a
    /// deferred message is only produced once the level check passes.
    ///
    /// # Example
    ///
    /// ```
    /// use logger_hierarchy::{Level, LogOptions, LoggerRegistry};
    ///
    /// let registry = LoggerRegistry::new();
    /// let logger = registry.get("app.io").unwrap();
    /// let err = std::io::Error::new(std::io::ErrorKind::Other, "socket closed");
    /// logger.log_with(Level::SEVERE, "write failed", LogOptions::new().with_error(err));
    /// ```
    pub fn log_with<'a>(&self, level: Level, message: impl Into<Message<'a>>, options: LogOptions) {
        if !self.is_loggable(level) {
            if self.shared.metrics_enabled() {
                self.shared.metrics.record_filtered();
            }
            return;
        }

        let (text, object) = message.into().render();
        let LogOptions {
            mut error,
            mut stack_trace,
            context,
        } = options;

        if stack_trace.is_none() && level >= self.shared.stack_trace_level() {
            stack_trace = Some(Arc::new(Backtrace::force_capture()));
            if error.is_none() {
                error = Some(Arc::new(GeneratedTraceError {
                    level,
                    message: text.clone(),
                }));
            }
        }

        let context = context.unwrap_or_else(ExecutionContext::current);
        let record = LogRecord::new(level, text, self.full_name.as_str(), context)
            .with_object(object)
            .with_error(error)
            .with_stack_trace(stack_trace);
        if self.shared.metrics_enabled() {
            self.shared.metrics.record_created();
        }

        self.publish(Arc::new(record));
    }

    fn publish(&self, record: Arc<LogRecord>) {
        if self.parent.is_none() || !self.shared.is_hierarchical() {
            self.root_node().publish_local(&record);
            return;
        }

        let mut node = Some(self);
        while let Some(current) = node {
            current.publish_local(&record);
            node = current.parent.as_deref();
        }
    }

    fn publish_local(&self, record: &Arc<LogRecord>) {
        let channel = self.records.lock().clone();
        if let Some(channel) = channel {
            let delivery = channel.publish(record);
            if self.shared.metrics_enabled() {
                self.shared.metrics.record_delivered(delivery.delivered as u64);
                if delivery.pruned > 0 {
                    self.shared.metrics.record_pruned(delivery.pruned as u64);
                }
            }
        }
    }

    #[inline]
    pub fn finest<'a>(&self, message: impl Into<Message<'a>>) {
        self.log(Level::FINEST, message);
    }

    #[inline]
    pub fn finer<'a>(&self, message: impl Into<Message<'a>>) {
        self.log(Level::FINER, message);
    }

    #[inline]
    pub fn fine<'a>(&self, message: impl Into<Message<'a>>) {
        self.log(Level::FINE, message);
    }

    #[inline]
    pub fn config<'a>(&self, message: impl Into<Message<'a>>) {
        self.log(Level::CONFIG, message);
    }

    #[inline]
    pub fn info<'a>(&self, message: impl Into<Message<'a>>) {
        self.log(Level::INFO, message);
    }

    #[inline]
    pub fn warning<'a>(&self, message: impl Into<Message<'a>>) {
        self.log(Level::WARNING, message);
    }

    #[inline]
    pub fn severe<'a>(&self, message: impl Into<Message<'a>>) {
        self.log(Level::SEVERE, message);
    }

    #[inline]
    pub fn shout<'a>(&self, message: impl Into<Message<'a>>) {
        self.log(Level::SHOUT, message);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("full_name", &self.full_name)
            .field("kind", &self.kind)
            .field("own_level", &self.own_level())
            .finish()
    }
}

impl fmt::Display for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name)
    }
}
