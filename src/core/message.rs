//! Message values accepted by the dispatcher
//!
//! A message is either a concrete value (text or an arbitrary object) or a
//! producer that is only evaluated once the level check has passed.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Non-string payload carried by a log record.
///
/// Implemented for every `Display + Debug + Send + Sync + 'static` type. The
/// `Display` output becomes the record's message.
pub trait LogObject: fmt::Display + fmt::Debug + Send + Sync + 'static {
    fn as_any(&self) -> &dyn Any;
}

impl<T> LogObject for T
where
    T: fmt::Display + fmt::Debug + Send + Sync + 'static,
{
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Message argument of a log call
pub enum Message<'a> {
    Text(Cow<'a, str>),
    Object(Arc<dyn LogObject>),
    Deferred(Box<dyn FnOnce() -> Message<'a> + 'a>),
}

impl<'a> Message<'a> {
    /// Defer message construction until the call is known to be enabled
    ///
    /// # Example
    ///
    /// ```
    /// use logger_hierarchy::{LoggerRegistry, Message};
    ///
    /// let registry = LoggerRegistry::new();
    /// let logger = registry.get("app").unwrap();
    /// logger.fine(Message::lazy(|| format!("expensive: {}", 40 + 2)));
    /// ```
    pub fn lazy<F, M>(producer: F) -> Self
    where
        F: FnOnce() -> M + 'a,
        M: Into<Message<'a>>,
    {
        Message::Deferred(Box::new(move || producer().into()))
    }

    /// Wrap a non-string value; it is kept on the record as its raw payload
    pub fn object<T: LogObject>(value: T) -> Self {
        Message::Object(Arc::new(value))
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, Message::Deferred(_))
    }

    /// Evaluate any producer and split into the rendered string and raw payload
    pub(crate) fn render(self) -> (String, Option<Arc<dyn LogObject>>) {
        let mut message = self;
        loop {
            match message {
                Message::Text(text) => return (text.into_owned(), None),
                Message::Object(object) => return (object.to_string(), Some(object)),
                Message::Deferred(producer) => message = producer(),
            }
        }
    }
}

impl fmt::Debug for Message<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Message::Object(object) => f.debug_tuple("Object").field(object).finish(),
            Message::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

impl<'a> From<&'a str> for Message<'a> {
    fn from(text: &'a str) -> Self {
        Message::Text(Cow::Borrowed(text))
    }
}

impl<'a> From<&'a String> for Message<'a> {
    fn from(text: &'a String) -> Self {
        Message::Text(Cow::Borrowed(text.as_str()))
    }
}

impl From<String> for Message<'_> {
    fn from(text: String) -> Self {
        Message::Text(Cow::Owned(text))
    }
}

impl<'a> From<Cow<'a, str>> for Message<'a> {
    fn from(text: Cow<'a, str>) -> Self {
        Message::Text(text)
    }
}

impl From<Arc<dyn LogObject>> for Message<'_> {
    fn from(object: Arc<dyn LogObject>) -> Self {
        Message::Object(object)
    }
}
