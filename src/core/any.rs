//! # Disjunctive waits: `any`, `any_once`, `any_many`.
//!
//! Every occurrence of any listed signal invokes the callback with the firing
//! signal name and payload, up to an optional invocation limit.
//!
//! ## Rules
//! - The invocation counter is claimed atomically, so at most `limit`
//!   invocations happen even when several signals fire at once.
//! - The operation detaches as soon as the last allowed invocation is claimed,
//!   before that invocation's callback runs.

use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Arc;

use tracing::{debug, trace};

use super::handle::{Registration, WaitHandle};
use super::signals::SignalSet;
use crate::bus::{Handler, SignalBus};
use crate::error::CallbackError;

/// State record of one disjunctive waiting operation.
pub(crate) struct AnyOp<B: SignalBus, F> {
    signals: SignalSet,
    /// `None` = unlimited invocations.
    limit: Option<usize>,
    fired: AtomicUsize,
    reg: Arc<Registration<B>>,
    callback: F,
}

impl<B, F> AnyOp<B, F>
where
    B: SignalBus,
    F: Fn(&str, &[B::Value]) -> Result<(), CallbackError> + Send + Sync + 'static,
{
    /// Registers the operation on `bus` and returns its handle.
    ///
    /// `once` subscribes with [`SignalBus::subscribe_once`]; used by `any_once`.
    pub(crate) fn register(
        bus: &Arc<B>,
        operation: &'static str,
        signals: SignalSet,
        limit: Option<usize>,
        once: bool,
        callback: F,
    ) -> WaitHandle<B> {
        let reg = Registration::new(bus, operation);
        let op = Arc::new(Self {
            signals,
            limit,
            fired: AtomicUsize::new(0),
            reg: Arc::clone(&reg),
            callback,
        });

        reg.attach(bus, &op.signals, once, |index| {
            let op = Arc::clone(&op);
            let handler: Handler<B::Value> =
                Arc::new(move |payload: &[B::Value]| op.on_occurrence(index, payload));
            handler
        });
        WaitHandle::new(reg)
    }

    fn on_occurrence(&self, index: usize, payload: &[B::Value]) -> Result<(), CallbackError> {
        if self.reg.is_detached() {
            return Ok(());
        }

        let invocation = match self.limit {
            None => self.fired.fetch_add(1, AtomicOrdering::Relaxed) + 1,
            Some(limit) => {
                let claimed = self.fired.fetch_update(
                    AtomicOrdering::AcqRel,
                    AtomicOrdering::Acquire,
                    |n| (n < limit).then_some(n + 1),
                );
                let Ok(prev) = claimed else {
                    return Ok(());
                };
                if prev + 1 == limit {
                    self.reg.detach();
                    debug!(
                        operation = self.reg.operation(),
                        limit,
                        "invocation limit reached"
                    );
                }
                prev + 1
            }
        };

        let signal = self.signals.name(index);
        trace!(
            operation = self.reg.operation(),
            signal,
            invocation,
            "occurrence delivered"
        );
        (self.callback)(signal, payload)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::bus::Emitter;
    use crate::sync::lock;

    type Seen = Arc<Mutex<Vec<(String, Vec<&'static str>)>>>;

    fn setup(
        limit: Option<usize>,
        once: bool,
    ) -> (Arc<Emitter<&'static str>>, WaitHandle<Emitter<&'static str>>, Seen) {
        let bus = Arc::new(Emitter::new());
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let signals = SignalSet::new(["a", "b"]).unwrap();
        let handle = AnyOp::register(&bus, "test", signals, limit, once, move |signal, payload| {
            lock(&sink).push((signal.to_string(), payload.to_vec()));
            Ok(())
        });
        (bus, handle, seen)
    }

    #[test]
    fn test_unlimited_sees_every_occurrence() {
        let (bus, handle, seen) = setup(None, false);
        bus.publish("a", &["1"]).unwrap();
        bus.publish("b", &["2", "3"]).unwrap();
        bus.publish("c", &["ignored"]).unwrap();
        bus.publish("a", &["4"]).unwrap();

        let seen = lock(&seen);
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[1], ("b".to_string(), vec!["2", "3"]));
        assert!(handle.is_active());
    }

    #[test]
    fn test_limit_detaches_after_last_invocation() {
        let (bus, handle, seen) = setup(Some(2), false);
        bus.publish("a", &["1"]).unwrap();
        bus.publish("b", &["2"]).unwrap();
        bus.publish("b", &["3"]).unwrap();

        assert_eq!(lock(&seen).len(), 2);
        assert!(!handle.is_active());
        assert_eq!(bus.handler_count("a"), 0);
        assert_eq!(bus.handler_count("b"), 0);
    }

    #[test]
    fn test_once_removes_every_handler() {
        let (bus, _handle, seen) = setup(Some(1), true);
        bus.publish("a", &["1"]).unwrap();
        bus.publish("b", &["2"]).unwrap();

        assert_eq!(*lock(&seen), vec![("a".to_string(), vec!["1"])]);
        assert_eq!(bus.handler_count("a"), 0);
        assert_eq!(bus.handler_count("b"), 0);
    }

    #[test]
    fn test_cleared_signal_leaves_others_running() {
        let (bus, handle, seen) = setup(None, false);
        bus.clear("a");
        bus.publish("b", &["1"]).unwrap();

        assert!(handle.is_active());
        assert_eq!(*lock(&seen), vec![("b".to_string(), vec!["1"])]);
    }

    #[test]
    fn test_reentrant_occurrence_in_same_turn_is_ignored() {
        let bus = Arc::new(Emitter::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let weak = Arc::downgrade(&bus);
        let signals = SignalSet::new(["a", "b"]).unwrap();
        AnyOp::register(&bus, "test", signals, Some(1), true, move |_, _: &[u8]| {
            counter.fetch_add(1, AtomicOrdering::SeqCst);
            if let Some(bus) = weak.upgrade() {
                bus.publish("b", &[2])?;
            }
            Ok(())
        });

        bus.publish("a", &[1]).unwrap();
        assert_eq!(calls.load(AtomicOrdering::SeqCst), 1);
    }
}
