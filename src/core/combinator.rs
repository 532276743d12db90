//! # Combinator: multi-signal waits over a [`SignalBus`].
//!
//! [`Combinator`] wraps a bus and adds seven waiting operations while keeping
//! the bus's own operations reachable through the same value.
//!
//! ## Operations
//! | Operation    | Fires when                               | Terminates                 |
//! |--------------|------------------------------------------|----------------------------|
//! | `all`        | every signal seen since the last round   | never (detach)             |
//! | `all_once`   | every signal seen                        | after one round            |
//! | `all_many`   | every signal seen, `count` times         | after `count` rounds       |
//! | `all_cached` | like `all`, repeats are queued not lost  | never (detach)             |
//! | `any`        | any signal fires                         | never (detach)             |
//! | `any_once`   | the first signal fires                   | after one invocation       |
//! | `any_many`   | any signal fires, `count` times          | after `count` invocations  |
//!
//! ## Example
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use waitset::{Combinator, Emitter, KeepPolicy, SignalBus};
//!
//! let on = Combinator::new(Emitter::<&'static str>::new());
//! let rounds = Arc::new(Mutex::new(Vec::new()));
//!
//! let sink = Arc::clone(&rounds);
//! on.all(["config", "db"], KeepPolicy::Last, move |args| {
//!     sink.lock().unwrap().push(args.into_map());
//!     Ok(())
//! })?;
//!
//! on.publish("config", &["loaded"])?;
//! on.publish("db", &["connected"])?;
//!
//! let rounds = rounds.lock().unwrap();
//! assert_eq!(rounds.len(), 1);
//! assert_eq!(rounds[0]["db"], vec!["connected"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use super::all::AllOp;
use super::any::AnyOp;
use super::cached::CachedOp;
use super::collected::Collected;
use super::handle::WaitHandle;
use super::signals::SignalSet;
use crate::bus::{Emitter, EmitterConfig, Handler, SignalBus, SubscriptionId};
use crate::error::{CallbackError, PublishError, WaitError};
use crate::policies::{CachePolicy, KeepPolicy};

/// Bus adapter exposing both the native bus operations and the combinators.
///
/// Cheap to clone: clones share the same bus.
pub struct Combinator<B: SignalBus> {
    bus: Arc<B>,
}

impl<B: SignalBus> Combinator<B> {
    /// Wraps an owned bus.
    pub fn new(bus: B) -> Self {
        Self { bus: Arc::new(bus) }
    }

    /// Wraps a bus that is already shared.
    pub fn from_arc(bus: Arc<B>) -> Self {
        Self { bus }
    }

    /// The wrapped bus.
    pub fn bus(&self) -> &Arc<B> {
        &self.bus
    }

    /// Calls `callback` once every signal has fired, then removes its handlers.
    ///
    /// With [`KeepPolicy::First`] later repeats of a signal are ignored; with
    /// [`KeepPolicy::Last`] the last occurrence before completion wins.
    ///
    /// # Errors
    /// [`WaitError::InvalidArgument`] for an empty or duplicated signal list.
    pub fn all_once<I, S, F>(
        &self,
        signals: I,
        keep: KeepPolicy,
        callback: F,
    ) -> Result<WaitHandle<B>, WaitError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(Collected<B::Value>) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        let signals = SignalSet::new(signals)?;
        Ok(AllOp::register(
            &self.bus,
            "all_once",
            signals,
            keep,
            Some(1),
            callback,
        ))
    }

    /// Calls `callback` for `count` complete rounds, then removes its handlers.
    ///
    /// # Errors
    /// [`WaitError::InvalidArgument`] for an empty or duplicated signal list,
    /// or `count == 0`.
    pub fn all_many<I, S, F>(
        &self,
        signals: I,
        count: usize,
        keep: KeepPolicy,
        callback: F,
    ) -> Result<WaitHandle<B>, WaitError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(Collected<B::Value>) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        let signals = SignalSet::new(signals)?;
        let count = positive(count)?;
        Ok(AllOp::register(
            &self.bus,
            "all_many",
            signals,
            keep,
            Some(count),
            callback,
        ))
    }

    /// Calls `callback` for every complete round, queueing repeated
    /// occurrences into later rounds instead of dropping them.
    ///
    /// # Errors
    /// [`WaitError::InvalidArgument`] for an empty or duplicated signal list.
    pub fn all_cached<I, S, F>(
        &self,
        signals: I,
        policy: CachePolicy,
        callback: F,
    ) -> Result<WaitHandle<B>, WaitError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(Collected<B::Value>) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        let signals = SignalSet::new(signals)?;
        Ok(CachedOp::register(&self.bus, signals, policy, callback))
    }

    /// Calls `callback` for every complete round until detached.
    ///
    /// # Errors
    /// [`WaitError::InvalidArgument`] for an empty or duplicated signal list.
    pub fn all<I, S, F>(
        &self,
        signals: I,
        keep: KeepPolicy,
        callback: F,
    ) -> Result<WaitHandle<B>, WaitError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(Collected<B::Value>) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        let signals = SignalSet::new(signals)?;
        Ok(AllOp::register(&self.bus, "all", signals, keep, None, callback))
    }

    /// Calls `callback` for the first occurrence of any signal, then removes
    /// every handler.
    ///
    /// # Errors
    /// [`WaitError::InvalidArgument`] for an empty or duplicated signal list.
    pub fn any_once<I, S, F>(&self, signals: I, callback: F) -> Result<WaitHandle<B>, WaitError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&str, &[B::Value]) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        let signals = SignalSet::new(signals)?;
        Ok(AnyOp::register(
            &self.bus,
            "any_once",
            signals,
            Some(1),
            true,
            callback,
        ))
    }

    /// Calls `callback` for the first `count` occurrences across all signals,
    /// then removes every handler.
    ///
    /// # Errors
    /// [`WaitError::InvalidArgument`] for an empty or duplicated signal list,
    /// or `count == 0`.
    pub fn any_many<I, S, F>(
        &self,
        signals: I,
        count: usize,
        callback: F,
    ) -> Result<WaitHandle<B>, WaitError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&str, &[B::Value]) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        let signals = SignalSet::new(signals)?;
        let count = positive(count)?;
        Ok(AnyOp::register(
            &self.bus,
            "any_many",
            signals,
            Some(count),
            false,
            callback,
        ))
    }

    /// Calls `callback` for every occurrence of any signal until detached.
    ///
    /// # Errors
    /// [`WaitError::InvalidArgument`] for an empty or duplicated signal list.
    pub fn any<I, S, F>(&self, signals: I, callback: F) -> Result<WaitHandle<B>, WaitError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&str, &[B::Value]) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        let signals = SignalSet::new(signals)?;
        Ok(AnyOp::register(&self.bus, "any", signals, None, false, callback))
    }
}

fn positive(count: usize) -> Result<usize, WaitError> {
    if count == 0 {
        Err(WaitError::invalid("count must be a positive integer"))
    } else {
        Ok(count)
    }
}

impl<V> Combinator<Emitter<V>>
where
    V: Clone + Send + Sync + 'static,
{
    /// Combinator over a fresh [`Emitter`] with the given configuration.
    pub fn with_config(config: EmitterConfig) -> Self {
        Self::new(Emitter::with_config(config))
    }
}

impl<B: SignalBus + Default> Default for Combinator<B> {
    fn default() -> Self {
        Self::new(B::default())
    }
}

impl<B: SignalBus> Clone for Combinator<B> {
    fn clone(&self) -> Self {
        Self {
            bus: Arc::clone(&self.bus),
        }
    }
}

impl<B: SignalBus> Deref for Combinator<B> {
    type Target = B;

    fn deref(&self) -> &B {
        &self.bus
    }
}

impl<B: SignalBus + fmt::Debug> fmt::Debug for Combinator<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Combinator").field("bus", &self.bus).finish()
    }
}

impl<B: SignalBus> SignalBus for Combinator<B> {
    type Value = B::Value;

    fn subscribe(&self, signal: &str, handler: Handler<B::Value>) -> SubscriptionId {
        self.bus.subscribe(signal, handler)
    }

    fn subscribe_once(&self, signal: &str, handler: Handler<B::Value>) -> SubscriptionId {
        self.bus.subscribe_once(signal, handler)
    }

    fn unsubscribe(&self, signal: &str, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(signal, id)
    }

    fn publish(&self, signal: &str, payload: &[B::Value]) -> Result<usize, PublishError> {
        self.bus.publish(signal, payload)
    }

    fn handler_count(&self, signal: &str) -> usize {
        self.bus.handler_count(signal)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;
    use crate::sync::lock;

    fn counter() -> (Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let c = Arc::new(AtomicUsize::new(0));
        (Arc::clone(&c), c)
    }

    #[test]
    fn test_rejects_invalid_arguments() {
        let on: Combinator<Emitter<u8>> = Combinator::default();
        let empty: [&str; 0] = [];

        let err = on.all(empty, KeepPolicy::Last, |_| Ok(())).unwrap_err();
        assert_eq!(err.as_label(), "wait_invalid_argument");
        assert!(on.any(["a", "a"], |_, _| Ok(())).is_err());
        assert!(on.all_many(["a"], 0, KeepPolicy::Last, |_| Ok(())).is_err());
        assert!(on.any_many(["a"], 0, |_, _| Ok(())).is_err());
        assert!(on.any_once(empty, |_, _| Ok(())).is_err());
        assert!(on.all_once(empty, KeepPolicy::First, |_| Ok(())).is_err());
        assert!(on.all_cached(empty, CachePolicy::default(), |_| Ok(())).is_err());
        assert!(on.signal_names().is_empty());
    }

    #[test]
    fn test_all_once_keep_last() {
        let on = Combinator::new(Emitter::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        on.all_once(["test1", "test2"], KeepPolicy::Last, move |args| {
            lock(&sink).push(args);
            Ok(())
        })
        .unwrap();

        let events = [
            ("test1", "arg1"),
            ("test1", "arg3"),
            ("test2", "arg2"),
            ("test2", "arg4"),
        ];
        for (signal, value) in events {
            on.publish(signal, &[value]).unwrap();
        }

        let seen = lock(&seen);
        assert_eq!(seen.len(), 1);
        assert_eq!(&seen[0]["test1"], &["arg3"]);
        assert_eq!(&seen[0]["test2"], &["arg2"]);
        assert_eq!(on.handler_count("test1"), 0);
        assert_eq!(on.handler_count("test2"), 0);
    }

    #[test]
    fn test_all_once_keep_first() {
        let on = Combinator::new(Emitter::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        on.all_once(["test1", "test2"], KeepPolicy::First, move |args| {
            lock(&sink).push(args);
            Ok(())
        })
        .unwrap();

        let events = [
            ("test1", "arg1"),
            ("test1", "arg3"),
            ("test2", "arg2"),
            ("test2", "arg4"),
        ];
        for (signal, value) in events {
            on.publish(signal, &[value]).unwrap();
        }

        let seen = lock(&seen);
        assert_eq!(seen.len(), 1);
        assert_eq!(&seen[0]["test1"], &["arg1"]);
        assert_eq!(&seen[0]["test2"], &["arg2"]);
    }

    #[test]
    fn test_any_many_then_nothing() {
        let on = Combinator::new(Emitter::<&'static str>::new());
        let (calls, seen) = counter();
        let handle = on
            .any_many(["test1", "test2"], 2, move |_, _| {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .unwrap();
        assert_eq!(handle.operation(), "any_many");

        on.publish("test1", &["arg1"]).unwrap();
        on.publish("test2", &["arg2"]).unwrap();
        on.publish("test2", &["arg3"]).unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 2);
        assert_eq!(on.handler_count("test1"), 0);
        assert_eq!(on.handler_count("test2"), 0);
    }

    #[test]
    fn test_operations_on_same_signal_are_independent() {
        let on = Combinator::new(Emitter::<u8>::new());
        let (first_calls, first_seen) = counter();
        let (second_calls, second_seen) = counter();

        let first = on
            .any(["a"], move |_, _| {
                first_calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .unwrap();
        on.any(["a"], move |_, _| {
            second_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .unwrap();

        on.publish("a", &[1]).unwrap();
        assert!(first.detach());
        assert!(!first.detach());
        on.publish("a", &[2]).unwrap();

        assert_eq!(first_seen.load(Ordering::SeqCst), 1);
        assert_eq!(second_seen.load(Ordering::SeqCst), 2);
        assert_eq!(on.handler_count("a"), 1);
    }

    #[test]
    fn test_native_operations_pass_through() {
        let on = Combinator::from_arc(Arc::new(Emitter::<u8>::new()));
        let (calls, seen) = counter();
        let id = on.subscribe(
            "raw",
            Arc::new(move |_: &[u8]| -> Result<(), CallbackError> {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        );

        let clone = on.clone();
        assert_eq!(clone.publish("raw", &[1]), Ok(1));
        assert!(on.unsubscribe("raw", id));
        assert_eq!(on.publish("raw", &[2]), Ok(0));
        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(on.bus(), clone.bus()));
    }

    #[test]
    fn test_callback_error_reaches_publisher() {
        let on = Combinator::new(Emitter::<u8>::new());
        on.any_once(["a", "b"], |_, _| Err(CallbackError::fatal("stop")))
            .unwrap();

        let err = on.publish("b", &[1]).unwrap_err();
        assert!(err.callback_error().is_fatal());
        // bookkeeping committed before the callback failed
        assert_eq!(on.handler_count("a"), 0);
        assert_eq!(on.publish("b", &[2]), Ok(0));
    }
}
