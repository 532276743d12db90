//! # In-process signal bus.
//!
//! [`Emitter`] is the built-in [`SignalBus`]: ordered per-signal handler lists
//! behind a mutex, with synchronous fan-out.
//!
//! ## Architecture
//! ```text
//! publish(signal, payload)
//!     │
//!     ├─► lock ─► snapshot handlers for `signal` ─► unlock
//!     │
//!     └─► h1(payload)? ─► h2(payload)? ─► ... ─► Ok(n)
//!           │    │
//!           │    └─ Err ─► PublishError::Callback (fan-out stops)
//!           └─ once-handler: unsubscribe first, skip if already gone
//! ```
//!
//! ## Rules
//! - The lock is **never** held while handlers run, so handlers may
//!   subscribe, unsubscribe or publish re-entrantly.
//! - A handler removed while a fan-out is in progress still sees that
//!   occurrence (the snapshot was taken before removal).
//! - A once-handler is removed right before it is invoked. If a fan-out
//!   stops early, once-handlers it did not reach stay registered.
//! - Removed handlers are dropped after the lock is released: dropping a
//!   handler may call back into the emitter.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex};

use tracing::warn;

use super::config::EmitterConfig;
use super::signal::{Handler, SignalBus, SubscriptionId};
use crate::error::PublishError;
use crate::sync::lock;

/// One registration in a signal's handler list.
struct Entry<V> {
    id: SubscriptionId,
    once: bool,
    handler: Handler<V>,
}

struct Registry<V> {
    handlers: HashMap<String, Vec<Entry<V>>>,
    /// Signals currently above `max_handlers` (already warned about).
    over_limit: HashSet<String>,
}

/// Built-in in-process [`SignalBus`].
///
/// ### Properties
/// - **Synchronous**: `publish()` runs every handler before returning.
/// - **Ordered**: handlers for one signal run in subscription order.
/// - **Thread-safe**: may be shared through an `Arc` and used from any thread.
pub struct Emitter<V> {
    registry: Mutex<Registry<V>>,
    next_id: AtomicU64,
    config: EmitterConfig,
}

impl<V> Emitter<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Creates an emitter with [`EmitterConfig::default`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EmitterConfig::default())
    }

    /// Creates an emitter with the given configuration.
    #[must_use]
    pub fn with_config(config: EmitterConfig) -> Self {
        Self {
            registry: Mutex::new(Registry {
                handlers: HashMap::new(),
                over_limit: HashSet::new(),
            }),
            next_id: AtomicU64::new(1),
            config,
        }
    }

    /// Returns the emitter configuration.
    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    /// Signal names with at least one handler, sorted.
    pub fn signal_names(&self) -> Vec<String> {
        let reg = lock(&self.registry);
        let mut names: Vec<String> = reg.handlers.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Removes every handler of `signal`. Returns how many were removed.
    pub fn clear(&self, signal: &str) -> usize {
        let removed = {
            let mut reg = lock(&self.registry);
            reg.over_limit.remove(signal);
            reg.handlers.remove(signal)
        };
        removed.map_or(0, |list| list.len())
    }

    /// Removes every handler of every signal.
    pub fn clear_all(&self) {
        let removed = {
            let mut reg = lock(&self.registry);
            reg.over_limit.clear();
            std::mem::take(&mut reg.handlers)
        };
        drop(removed);
    }

    fn register(&self, signal: &str, handler: Handler<V>, once: bool) -> SubscriptionId {
        let id = SubscriptionId::new(self.next_id.fetch_add(1, AtomicOrdering::Relaxed));
        let mut reg = lock(&self.registry);
        let list = reg.handlers.entry(signal.to_string()).or_default();
        list.push(Entry { id, once, handler });
        let count = list.len();

        if let Some(limit) = self.config.max_handlers_limit() {
            if count > limit && reg.over_limit.insert(signal.to_string()) {
                warn!(
                    signal,
                    count,
                    limit,
                    "possible handler leak: more handlers than max_handlers"
                );
            }
        }
        id
    }

    fn rearm_warning(&self, reg: &mut Registry<V>, signal: &str, count: usize) {
        if let Some(limit) = self.config.max_handlers_limit() {
            if count <= limit {
                reg.over_limit.remove(signal);
            }
        }
    }
}

impl<V> Default for Emitter<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for Emitter<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reg = lock(&self.registry);
        let counts: HashMap<&str, usize> = reg
            .handlers
            .iter()
            .map(|(name, list)| (name.as_str(), list.len()))
            .collect();
        f.debug_struct("Emitter")
            .field("handlers", &counts)
            .field("config", &self.config)
            .finish()
    }
}

impl<V> SignalBus for Emitter<V>
where
    V: Clone + Send + Sync + 'static,
{
    type Value = V;

    fn subscribe(&self, signal: &str, handler: Handler<V>) -> SubscriptionId {
        self.register(signal, handler, false)
    }

    fn subscribe_once(&self, signal: &str, handler: Handler<V>) -> SubscriptionId {
        self.register(signal, handler, true)
    }

    fn unsubscribe(&self, signal: &str, id: SubscriptionId) -> bool {
        let removed = {
            let mut reg = lock(&self.registry);
            let Some(list) = reg.handlers.get_mut(signal) else {
                return false;
            };
            let Some(pos) = list.iter().position(|e| e.id == id) else {
                return false;
            };
            let removed = list.remove(pos);
            let count = list.len();
            if count == 0 {
                reg.handlers.remove(signal);
            }
            self.rearm_warning(&mut reg, signal, count);
            removed
        };
        drop(removed);
        true
    }

    fn publish(&self, signal: &str, payload: &[V]) -> Result<usize, PublishError> {
        let snapshot: Vec<(SubscriptionId, bool, Handler<V>)> = {
            let reg = lock(&self.registry);
            let Some(list) = reg.handlers.get(signal) else {
                return Ok(0);
            };
            list.iter()
                .map(|e| (e.id, e.once, Arc::clone(&e.handler)))
                .collect()
        };

        let mut invoked = 0;
        for (id, once, handler) in &snapshot {
            // consumed by an earlier (possibly re-entrant) delivery
            if *once && !self.unsubscribe(signal, *id) {
                continue;
            }
            handler(payload).map_err(|source| PublishError::Callback {
                signal: signal.to_string(),
                source,
            })?;
            invoked += 1;
        }
        Ok(invoked)
    }

    fn handler_count(&self, signal: &str) -> usize {
        lock(&self.registry)
            .handlers
            .get(signal)
            .map_or(0, |list| list.len())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::error::CallbackError;

    fn recorder(log: &Arc<Mutex<Vec<String>>>, tag: &'static str) -> Handler<&'static str> {
        let log = Arc::clone(log);
        Arc::new(move |payload: &[&'static str]| -> Result<(), CallbackError> {
            lock(&log).push(format!("{tag}:{}", payload.join(",")));
            Ok(())
        })
    }

    #[test]
    fn test_fan_out_in_subscription_order() {
        let bus = Emitter::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe("a", recorder(&log, "h1"));
        bus.subscribe("a", recorder(&log, "h2"));
        bus.subscribe("b", recorder(&log, "other"));

        assert_eq!(bus.publish("a", &["x", "y"]), Ok(2));
        assert_eq!(*lock(&log), vec!["h1:x,y", "h2:x,y"]);
    }

    #[test]
    fn test_publish_without_handlers_is_noop() {
        let bus: Emitter<u32> = Emitter::new();
        assert_eq!(bus.publish("nobody", &[1]), Ok(0));
    }

    #[test]
    fn test_once_handler_fires_once() {
        let bus = Emitter::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe_once("a", recorder(&log, "once"));
        assert_eq!(bus.handler_count("a"), 1);

        bus.publish("a", &["1"]).unwrap();
        bus.publish("a", &["2"]).unwrap();
        assert_eq!(*lock(&log), vec!["once:1"]);
        assert_eq!(bus.handler_count("a"), 0);
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let bus = Emitter::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let id = bus.subscribe("a", recorder(&log, "h"));
        assert!(bus.unsubscribe("a", id));
        assert!(!bus.unsubscribe("a", id));
        assert!(!bus.unsubscribe("missing", id));
        assert_eq!(bus.handler_count("a"), 0);
        assert!(bus.signal_names().is_empty());
    }

    #[test]
    fn test_unsubscribe_only_removes_matching_id() {
        let bus = Emitter::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let first = bus.subscribe("a", recorder(&log, "first"));
        bus.subscribe("a", recorder(&log, "second"));
        bus.unsubscribe("a", first);

        bus.publish("a", &["x"]).unwrap();
        assert_eq!(*lock(&log), vec!["second:x"]);
    }

    #[test]
    fn test_handler_error_stops_fan_out() {
        let bus = Emitter::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe(
            "a",
            Arc::new(|_: &[&'static str]| Err::<(), _>(CallbackError::fail("boom"))),
        );
        bus.subscribe("a", recorder(&log, "after"));

        let err = bus.publish("a", &["x"]).unwrap_err();
        assert_eq!(
            err,
            PublishError::Callback {
                signal: "a".into(),
                source: CallbackError::fail("boom"),
            }
        );
        assert!(lock(&log).is_empty());
    }

    #[test]
    fn test_once_handler_survives_failed_fan_out() {
        let bus = Emitter::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let failed = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&failed);
        bus.subscribe(
            "a",
            Arc::new(move |_: &[&'static str]| -> Result<(), CallbackError> {
                if counter.fetch_add(1, AtomicOrdering::SeqCst) == 0 {
                    return Err(CallbackError::fail("first call fails"));
                }
                Ok(())
            }),
        );
        bus.subscribe_once("a", recorder(&log, "once"));

        assert!(bus.publish("a", &["x"]).is_err());
        assert_eq!(bus.handler_count("a"), 2);
        assert!(lock(&log).is_empty());

        assert_eq!(bus.publish("a", &["y"]), Ok(2));
        assert_eq!(*lock(&log), vec!["once:y"]);
        assert_eq!(bus.handler_count("a"), 1);
    }

    #[test]
    fn test_once_handler_removed_mid_fan_out_is_skipped() {
        let bus = Arc::new(Emitter::new());
        let log = Arc::new(Mutex::new(Vec::new()));
        let target: Arc<Mutex<Option<SubscriptionId>>> = Arc::new(Mutex::new(None));

        let weak = Arc::downgrade(&bus);
        let victim = Arc::clone(&target);
        bus.subscribe(
            "a",
            Arc::new(move |_: &[&'static str]| -> Result<(), CallbackError> {
                if let (Some(bus), Some(id)) = (weak.upgrade(), *lock(&victim)) {
                    bus.unsubscribe("a", id);
                }
                Ok(())
            }),
        );
        let id = bus.subscribe_once("a", recorder(&log, "once"));
        *lock(&target) = Some(id);

        assert_eq!(bus.publish("a", &["x"]), Ok(1));
        assert!(lock(&log).is_empty());
        assert_eq!(bus.handler_count("a"), 1);
    }

    #[test]
    fn test_reentrant_publish_from_handler() {
        let bus = Arc::new(Emitter::new());
        let seen = Arc::new(AtomicUsize::new(0));

        let weak = Arc::downgrade(&bus);
        let counter = Arc::clone(&seen);
        bus.subscribe(
            "ping",
            Arc::new(move |payload: &[u32]| -> Result<(), CallbackError> {
                counter.fetch_add(1, AtomicOrdering::SeqCst);
                if payload[0] > 0 {
                    if let Some(bus) = weak.upgrade() {
                        bus.publish("ping", &[payload[0] - 1])?;
                    }
                }
                Ok(())
            }),
        );

        bus.publish("ping", &[3]).unwrap();
        assert_eq!(seen.load(AtomicOrdering::SeqCst), 4);
    }

    #[test]
    fn test_clear_and_signal_names() {
        let bus = Emitter::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe("b", recorder(&log, "b"));
        bus.subscribe("a", recorder(&log, "a1"));
        bus.subscribe("a", recorder(&log, "a2"));
        assert_eq!(bus.signal_names(), vec!["a", "b"]);

        assert_eq!(bus.clear("a"), 2);
        assert_eq!(bus.signal_names(), vec!["b"]);
        bus.clear_all();
        assert!(bus.signal_names().is_empty());
    }

    #[test]
    fn test_over_limit_subscriptions_are_still_accepted() {
        let bus = Emitter::with_config(EmitterConfig { max_handlers: 1 });
        let log = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe("a", recorder(&log, "1"));
        bus.subscribe("a", recorder(&log, "2"));
        bus.subscribe("a", recorder(&log, "3"));
        assert_eq!(bus.handler_count("a"), 3);
        assert_eq!(bus.publish("a", &["x"]), Ok(3));
    }
}
