//! Execution context captured with each log record
//!
//! This module provides:
//! - `ExecutionContext`: identifies the thread (and scoped fields) a record was created on
//! - `FieldValue`: value type for structured context fields
//! - `ContextGuard`: RAII guard for fields scoped to the current thread

use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

// Thread-local caches for thread information to avoid repeated allocations
thread_local! {
    static THREAD_ID_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
    static THREAD_NAME_CACHE: RefCell<Option<Option<String>>> = const { RefCell::new(None) };
    static SCOPED_FIELDS: RefCell<Vec<ScopedField>> = const { RefCell::new(Vec::new()) };
    static NEXT_SCOPE_ID: Cell<u64> = const { Cell::new(0) };
}

struct ScopedField {
    id: u64,
    key: String,
    value: FieldValue,
}

/// Get cached thread ID, computing and caching it on first access
fn get_thread_id() -> String {
    THREAD_ID_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| format!("{:?}", std::thread::current().id()))
            .clone()
    })
}

/// Get cached thread name, computing and caching it on first access
fn get_thread_name() -> Option<String> {
    THREAD_NAME_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| std::thread::current().name().map(String::from))
            .clone()
    })
}

/// Value type for structured context fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Null => write!(f, "null"),
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

/// Opaque tag identifying where a record was created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionContext {
    thread_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    thread_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    fields: BTreeMap<String, FieldValue>,
}

impl ExecutionContext {
    /// Capture the calling thread and its scoped fields
    pub fn current() -> Self {
        let fields = SCOPED_FIELDS.with(|scoped| {
            scoped
                .borrow()
                .iter()
                .map(|field| (field.key.clone(), field.value.clone()))
                .collect()
        });

        Self {
            thread_id: get_thread_id(),
            thread_name: get_thread_name(),
            label: None,
            fields,
        }
    }

    /// Create an explicitly labelled context for the calling thread
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            thread_id: get_thread_id(),
            thread_name: get_thread_name(),
            label: Some(label.into()),
            fields: BTreeMap::new(),
        }
    }

    /// Add a field to the context
    pub fn with_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Push a field that every `current()` capture on this thread includes
    /// until the returned guard is dropped
    ///
    /// # Example
    ///
    /// ```
    /// use logger_hierarchy::{ExecutionContext, FieldValue};
    ///
    /// {
    ///     let _guard = ExecutionContext::scope("request_id", "abc-123");
    ///     let ctx = ExecutionContext::current();
    ///     assert_eq!(ctx.field("request_id"), Some(&FieldValue::from("abc-123")));
    /// }
    /// assert!(ExecutionContext::current().field("request_id").is_none());
    /// ```
    #[must_use = "the field is removed as soon as the guard is dropped"]
    pub fn scope<K, V>(key: K, value: V) -> ContextGuard
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let id = NEXT_SCOPE_ID.with(|next| {
            let id = next.get();
            next.set(id + 1);
            id
        });
        SCOPED_FIELDS.with(|scoped| {
            scoped.borrow_mut().push(ScopedField {
                id,
                key: key.into(),
                value: value.into(),
            });
        });
        ContextGuard {
            id,
            _not_send: PhantomData,
        }
    }

    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    pub fn thread_name(&self) -> Option<&str> {
        self.thread_name.as_deref()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }
}

impl fmt::Display for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.label, &self.thread_name) {
            (Some(label), _) => write!(f, "{}", label)?,
            (None, Some(name)) => write!(f, "{}", name)?,
            (None, None) => write!(f, "{}", self.thread_id)?,
        }
        for (key, value) in &self.fields {
            write!(f, " {}={}", key, value)?;
        }
        Ok(())
    }
}

/// RAII guard for a scoped context field
///
/// Dropping the guard removes only its own field, in whatever order guards
/// are dropped. When keys repeat, the most recently pushed live field wins.
pub struct ContextGuard {
    id: u64,
    // Scoped fields live in thread-local storage
    _not_send: PhantomData<*const ()>,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        SCOPED_FIELDS.with(|scoped| {
            let mut scoped = scoped.borrow_mut();
            if let Some(pos) = scoped.iter().rposition(|field| field.id == self.id) {
                scoped.remove(pos);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_captures_thread() {
        let ctx = ExecutionContext::current();
        assert_eq!(ctx.thread_id(), format!("{:?}", std::thread::current().id()));
        assert!(ctx.label().is_none());
        assert!(ctx.fields().is_empty());
    }

    #[test]
    fn test_named_thread() {
        let handle = std::thread::Builder::new()
            .name("worker-7".to_string())
            .spawn(ExecutionContext::current)
            .unwrap();
        let ctx = handle.join().unwrap();
        assert_eq!(ctx.thread_name(), Some("worker-7"));
        assert_ne!(ctx, ExecutionContext::current());
    }

    #[test]
    fn test_scoped_fields() {
        let outer = ExecutionContext::scope("request_id", "r-1");
        {
            let _inner = ExecutionContext::scope("attempt", 2);
            let ctx = ExecutionContext::current();
            assert_eq!(ctx.fields().len(), 2);
            assert_eq!(ctx.field("attempt"), Some(&FieldValue::Int(2)));
        }

        let ctx = ExecutionContext::current();
        assert_eq!(ctx.fields().len(), 1);
        assert!(ctx.field("attempt").is_none());

        drop(outer);
        assert!(ExecutionContext::current().fields().is_empty());
    }

    #[test]
    fn test_guards_dropped_out_of_order() {
        let outer = ExecutionContext::scope("request_id", "r-1");
        let inner = ExecutionContext::scope("attempt", 1);

        drop(outer);
        let later = ExecutionContext::scope("phase", "retry");
        drop(inner);

        let ctx = ExecutionContext::current();
        assert_eq!(ctx.fields().len(), 1);
        assert_eq!(ctx.field("phase"), Some(&FieldValue::from("retry")));

        drop(later);
        assert!(ExecutionContext::current().fields().is_empty());
    }

    #[test]
    fn test_shadowing_survives_outer_drop() {
        let outer = ExecutionContext::scope("user", "alice");
        let inner = ExecutionContext::scope("user", "bob");
        drop(outer);
        assert_eq!(
            ExecutionContext::current().field("user"),
            Some(&FieldValue::from("bob"))
        );
        drop(inner);
        assert!(ExecutionContext::current().field("user").is_none());
    }

    #[test]
    fn test_inner_scope_shadows_outer() {
        let _outer = ExecutionContext::scope("user", "alice");
        let _inner = ExecutionContext::scope("user", "bob");
        let ctx = ExecutionContext::current();
        assert_eq!(ctx.field("user"), Some(&FieldValue::from("bob")));
    }

    #[test]
    fn test_labelled_context_display() {
        let ctx = ExecutionContext::new("batch-job").with_field("shard", 3);
        assert_eq!(ctx.label(), Some("batch-job"));
        assert_eq!(ctx.to_string(), "batch-job shard=3");
    }

    #[test]
    fn test_serialization_skips_empty() {
        let ctx = ExecutionContext::new("job");
        let json = serde_json::to_value(&ctx).unwrap();
        assert_eq!(json["label"], "job");
        assert!(json.get("fields").is_none());
    }
}
