//! Multi-listener broadcast channel
//!
//! Every listener receives every published value. Listeners are either
//! streams (a `Subscription` drained by the consumer) or handlers invoked
//! synchronously on the publishing thread.

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::RwLock;
use std::cell::RefCell;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

static NEXT_CHANNEL_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_SUBSCRIPTION_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    // Channels currently delivering on this thread
    static FIRING: RefCell<Vec<u64>> = const { RefCell::new(Vec::new()) };
}

/// Callback invoked synchronously for every published value
pub type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Identifies one listener of a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    fn next() -> Self {
        SubscriptionId(NEXT_SUBSCRIPTION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

enum Sink<T> {
    Stream(Sender<T>),
    Handler(Handler<T>),
}

struct Listener<T> {
    id: SubscriptionId,
    sink: Sink<T>,
}

impl<T> Clone for Listener<T> {
    fn clone(&self) -> Self {
        let sink = match &self.sink {
            Sink::Stream(sender) => Sink::Stream(sender.clone()),
            Sink::Handler(handler) => Sink::Handler(Arc::clone(handler)),
        };
        Self { id: self.id, sink }
    }
}

/// Outcome of a single publish
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Listeners that received the value
    pub delivered: usize,
    /// Stream listeners removed because their subscription was dropped
    pub pruned: usize,
}

/// Marks a channel as firing on the current thread until dropped
struct FiringGuard {
    channel: u64,
}

impl FiringGuard {
    fn enter(channel: u64) -> Self {
        FIRING.with(|firing| firing.borrow_mut().push(channel));
        Self { channel }
    }
}

impl Drop for FiringGuard {
    fn drop(&mut self) {
        FIRING.with(|firing| {
            let mut firing = firing.borrow_mut();
            if let Some(pos) = firing.iter().rposition(|id| *id == self.channel) {
                firing.remove(pos);
            }
        });
    }
}

pub(crate) struct Broadcast<T> {
    id: u64,
    listeners: RwLock<Vec<Listener<T>>>,
}

impl<T: Clone> Broadcast<T> {
    pub(crate) fn new() -> Self {
        Self {
            id: NEXT_CHANNEL_ID.fetch_add(1, Ordering::Relaxed),
            listeners: RwLock::new(Vec::new()),
        }
    }

    pub(crate) fn subscribe(&self) -> Subscription<T> {
        let (sender, receiver) = unbounded();
        let id = SubscriptionId::next();
        self.listeners.write().push(Listener {
            id,
            sink: Sink::Stream(sender),
        });
        Subscription { id, receiver }
    }

    pub(crate) fn subscribe_with(&self, handler: Handler<T>) -> SubscriptionId {
        let id = SubscriptionId::next();
        self.listeners.write().push(Listener {
            id,
            sink: Sink::Handler(handler),
        });
        id
    }

    pub(crate) fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = {
            let mut listeners = self.listeners.write();
            listeners
                .iter()
                .position(|listener| listener.id == id)
                .map(|pos| listeners.remove(pos))
        };
        // Dropped here, after the write guard: a handler's captures may log
        removed.is_some()
    }

    pub(crate) fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    /// Whether this channel is delivering a value on the calling thread
    pub(crate) fn is_firing(&self) -> bool {
        FIRING.with(|firing| firing.borrow().contains(&self.id))
    }

    /// Drop every listener; open subscriptions observe the channel as closed
    pub(crate) fn close(&self) {
        let removed = std::mem::take(&mut *self.listeners.write());
        drop(removed);
    }

    /// Deliver `value` to every listener on the calling thread.
    ///
    /// Listeners are snapshotted first so no lock is held while handlers run;
    /// a handler may subscribe, log, or publish elsewhere.
    pub(crate) fn publish(&self, value: &T) -> Delivery {
        let snapshot: Vec<Listener<T>> = self.listeners.read().clone();
        if snapshot.is_empty() {
            return Delivery::default();
        }

        let mut delivery = Delivery::default();
        let mut disconnected = Vec::new();
        {
            let _firing = FiringGuard::enter(self.id);
            for listener in &snapshot {
                match &listener.sink {
                    Sink::Stream(sender) => {
                        if sender.send(value.clone()).is_err() {
                            disconnected.push(listener.id);
                            continue;
                        }
                    }
                    Sink::Handler(handler) => handler(value),
                }
                delivery.delivered += 1;
            }
        }

        if !disconnected.is_empty() {
            let mut listeners = self.listeners.write();
            let before = listeners.len();
            listeners.retain(|listener| !disconnected.contains(&listener.id));
            delivery.pruned = before - listeners.len();
        }

        delivery
    }
}

impl<T> fmt::Debug for Broadcast<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Broadcast")
            .field("id", &self.id)
            .field("listeners", &self.listeners.read().len())
            .finish()
    }
}

/// Stream side of a channel listener
///
/// Values queue up until read. Dropping the subscription unsubscribes it.
/// Once the channel is cleared, reads return `None` after the queue drains.
pub struct Subscription<T> {
    id: SubscriptionId,
    receiver: Receiver<T>,
}

impl<T> Subscription<T> {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Block until a value arrives; `None` once the channel is closed and drained
    pub fn recv(&self) -> Option<T> {
        self.receiver.recv().ok()
    }

    pub fn try_recv(&self) -> Option<T> {
        self.receiver.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<T> {
        self.receiver.recv_timeout(timeout).ok()
    }

    /// Iterate over queued values without blocking
    pub fn try_iter(&self) -> crossbeam_channel::TryIter<'_, T> {
        self.receiver.try_iter()
    }

    /// Blocking iterator that ends when the channel is closed
    pub fn iter(&self) -> crossbeam_channel::Iter<'_, T> {
        self.receiver.iter()
    }

    /// Take every queued value
    pub fn drain(&self) -> Vec<T> {
        self.receiver.try_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

impl<T> IntoIterator for Subscription<T> {
    type Item = T;
    type IntoIter = crossbeam_channel::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.receiver.into_iter()
    }
}

impl<T> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("queued", &self.receiver.len())
            .finish()
    }
}
