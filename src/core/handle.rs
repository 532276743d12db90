//! # Per-operation registration record and its public handle.
//!
//! Every waiting operation owns one [`Registration`]: the list of
//! `(signal, SubscriptionId)` pairs it put on the bus plus a `detached` flag.
//! Its handlers capture the registration so self-terminating operations can
//! tear themselves down; callers get a [`WaitHandle`] to do it externally.
//!
//! ## Rules
//! - `detach()` is **idempotent**: the second call finds nothing to remove.
//! - Detaching removes only this operation's subscriptions, never another
//!   operation's handlers on the same signal.
//! - A subscription recorded after detach is removed immediately (covers a
//!   concurrent publish completing the operation while it is still registering).
//! - The registration holds the bus weakly; a dropped bus has nothing to detach.
//! - A conjunctive registration cannot complete without every signal: if the
//!   bus drops one of its handlers without a detach (e.g. `Emitter::clear`),
//!   the whole operation detaches.

use std::fmt;
use std::sync::{Arc, Mutex, Weak};

use tracing::debug;

use super::signals::SignalSet;
use crate::bus::{Handler, SignalBus, SubscriptionId};
use crate::sync::lock;

struct Subscriptions {
    entries: Vec<(Arc<str>, SubscriptionId)>,
    detached: bool,
}

/// Subscriptions of one waiting operation.
pub(crate) struct Registration<B: SignalBus> {
    bus: Weak<B>,
    operation: &'static str,
    /// Detach everything when one handler is lost.
    conjunctive: bool,
    subs: Mutex<Subscriptions>,
}

impl<B: SignalBus> Registration<B> {
    /// Registration of a disjunctive operation: losing one handler leaves the
    /// others running.
    pub(crate) fn new(bus: &Arc<B>, operation: &'static str) -> Arc<Self> {
        Self::build(bus, operation, false)
    }

    /// Registration of a conjunctive operation: losing one handler detaches it.
    pub(crate) fn conjunctive(bus: &Arc<B>, operation: &'static str) -> Arc<Self> {
        Self::build(bus, operation, true)
    }

    fn build(bus: &Arc<B>, operation: &'static str, conjunctive: bool) -> Arc<Self> {
        Arc::new(Self {
            bus: Arc::downgrade(bus),
            operation,
            conjunctive,
            subs: Mutex::new(Subscriptions {
                entries: Vec::new(),
                detached: false,
            }),
        })
    }

    pub(crate) fn operation(&self) -> &'static str {
        self.operation
    }

    /// Subscribes one handler per signal of `signals`, built by `make(index)`.
    pub(crate) fn attach<H>(
        self: &Arc<Self>,
        bus: &B,
        signals: &SignalSet,
        once: bool,
        mut make: H,
    ) where
        H: FnMut(usize) -> Handler<B::Value>,
    {
        for index in 0..signals.len() {
            let name = signals.shared_name(index);
            let handler = self.watch(Arc::clone(&name), make(index));
            let id = if once {
                bus.subscribe_once(&name, handler)
            } else {
                bus.subscribe(&name, handler)
            };
            self.push(name, id);
        }
        debug!(
            operation = self.operation,
            signals = %signals,
            once,
            "waiting operation registered"
        );
    }

    /// Wraps `handler` so that dropping it outside of a detach is noticed.
    fn watch(
        self: &Arc<Self>,
        signal: Arc<str>,
        handler: Handler<B::Value>,
    ) -> Handler<B::Value> {
        if !self.conjunctive {
            return handler;
        }
        let watcher = Watcher {
            reg: Arc::downgrade(self),
            signal,
        };
        Arc::new(move |payload: &[B::Value]| {
            let _watcher = &watcher;
            handler(payload)
        })
    }

    fn handler_lost(&self, signal: &str) {
        if self.is_detached() {
            return;
        }
        debug!(
            operation = self.operation,
            signal,
            "handler removed externally; detaching operation"
        );
        self.detach();
    }

    /// Records a subscription made on behalf of this operation.
    pub(crate) fn push(&self, signal: Arc<str>, id: SubscriptionId) {
        let mut subs = lock(&self.subs);
        if subs.detached {
            drop(subs);
            if let Some(bus) = self.bus.upgrade() {
                bus.unsubscribe(&signal, id);
            }
            return;
        }
        subs.entries.push((signal, id));
    }

    #[inline]
    pub(crate) fn is_detached(&self) -> bool {
        lock(&self.subs).detached
    }

    /// Unsubscribes every handler of this operation.
    ///
    /// Returns `true` if this call performed the detach.
    pub(crate) fn detach(&self) -> bool {
        let entries = {
            let mut subs = lock(&self.subs);
            if subs.detached {
                return false;
            }
            subs.detached = true;
            std::mem::take(&mut subs.entries)
        };

        if let Some(bus) = self.bus.upgrade() {
            for (signal, id) in &entries {
                bus.unsubscribe(signal, *id);
            }
        }
        debug!(
            operation = self.operation,
            handlers = entries.len(),
            "waiting operation detached"
        );
        true
    }
}

/// Travels inside a conjunctive handler and reports its drop.
struct Watcher<B: SignalBus> {
    reg: Weak<Registration<B>>,
    signal: Arc<str>,
}

impl<B: SignalBus> Drop for Watcher<B> {
    fn drop(&mut self) {
        if let Some(reg) = self.reg.upgrade() {
            reg.handler_lost(&self.signal);
        }
    }
}

/// Handle to a registered waiting operation.
///
/// Dropping the handle does **not** detach the operation: unlimited waits
/// (`all`, `any`, `all_cached`) keep running until [`WaitHandle::detach`] is
/// called. Use [`WaitHandle::into_guard`] for scope-bound waits.
pub struct WaitHandle<B: SignalBus> {
    reg: Arc<Registration<B>>,
}

impl<B: SignalBus> WaitHandle<B> {
    pub(crate) fn new(reg: Arc<Registration<B>>) -> Self {
        Self { reg }
    }

    /// Removes every handler this operation registered.
    ///
    /// Idempotent; returns `true` only for the call that actually detached.
    pub fn detach(&self) -> bool {
        self.reg.detach()
    }

    /// True until the operation terminates on its own or is detached.
    pub fn is_active(&self) -> bool {
        !self.reg.is_detached()
    }

    /// Name of the combinator that created this operation (e.g. `"all_many"`).
    pub fn operation(&self) -> &'static str {
        self.reg.operation()
    }

    /// Converts into a guard that detaches on drop.
    #[must_use]
    pub fn into_guard(self) -> DetachGuard<B> {
        DetachGuard { handle: self }
    }
}

impl<B: SignalBus> Clone for WaitHandle<B> {
    fn clone(&self) -> Self {
        Self {
            reg: Arc::clone(&self.reg),
        }
    }
}

impl<B: SignalBus> fmt::Debug for WaitHandle<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaitHandle")
            .field("operation", &self.operation())
            .field("active", &self.is_active())
            .finish()
    }
}

/// Detaches its operation when dropped.
#[must_use = "dropping the guard detaches the operation immediately"]
pub struct DetachGuard<B: SignalBus> {
    handle: WaitHandle<B>,
}

impl<B: SignalBus> DetachGuard<B> {
    /// The guarded handle.
    pub fn handle(&self) -> &WaitHandle<B> {
        &self.handle
    }
}

impl<B: SignalBus> Drop for DetachGuard<B> {
    fn drop(&mut self) {
        self.handle.detach();
    }
}

impl<B: SignalBus> fmt::Debug for DetachGuard<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DetachGuard").field(&self.handle).finish()
    }
}
