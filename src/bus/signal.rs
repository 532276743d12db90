//! # The publish/subscribe contract the combinators are built on.
//!
//! [`SignalBus`] is the minimal surface a notification primitive must expose
//! for [`Combinator`](crate::Combinator) to wait on combinations of signals:
//!
//! ```text
//! subscribe(signal, handler)      ──► SubscriptionId
//! subscribe_once(signal, handler) ──► SubscriptionId   (removed before first delivery)
//! unsubscribe(signal, id)         ──► bool             (idempotent)
//! publish(signal, payload)        ──► handlers invoked (synchronous fan-out)
//! ```
//!
//! ## Rules
//! - Delivery is **synchronous**: `publish` returns after every handler ran.
//! - Handlers for one signal run in **subscription order**.
//! - `unsubscribe` of an already-removed id is a no-op, never an error.
//! - A handler error stops the fan-out and is returned to the publisher.

use std::fmt;
use std::sync::Arc;

use crate::error::{CallbackError, PublishError};

/// A registered handler: receives the payload of one occurrence.
pub type Handler<V> = Arc<dyn Fn(&[V]) -> Result<(), CallbackError> + Send + Sync>;

/// Opaque token identifying one handler registration on one signal name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Wraps a raw id. Buses are responsible for keeping ids unique.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// Publish/subscribe primitive keyed by signal name.
///
/// Implementations must be usable from handlers: a handler may subscribe,
/// unsubscribe or publish on the same bus while it is being invoked.
/// A handler may also call back into the bus when it is dropped, so removed
/// handlers must be dropped after internal locks are released.
pub trait SignalBus: Send + Sync + 'static {
    /// Payload element type carried by occurrences.
    type Value: Clone + Send + Sync + 'static;

    /// Registers `handler` for every occurrence of `signal`.
    fn subscribe(&self, signal: &str, handler: Handler<Self::Value>) -> SubscriptionId;

    /// Registers `handler` for the next occurrence of `signal` only.
    fn subscribe_once(&self, signal: &str, handler: Handler<Self::Value>) -> SubscriptionId;

    /// Removes a registration. Returns `false` if it was already gone.
    fn unsubscribe(&self, signal: &str, id: SubscriptionId) -> bool;

    /// Delivers one occurrence of `signal` to its current handlers.
    ///
    /// Returns the number of handlers invoked.
    fn publish(&self, signal: &str, payload: &[Self::Value]) -> Result<usize, PublishError>;

    /// Number of handlers currently registered for `signal`.
    fn handler_count(&self, signal: &str) -> usize;
}
