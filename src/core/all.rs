//! # Conjunctive waits: `all`, `all_once`, `all_many`.
//!
//! One [`AllOp`] per waiting operation, shared by one handler per signal.
//!
//! ## Round lifecycle
//! ```text
//! occurrence(S, payload)
//!   ├─► lock state ─► record S (KeepPolicy) ─► remaining > 0 ? ─► unlock, done
//!   │                                              │
//!   │                                              └─ 0: completed += 1
//!   │                                                    snapshot-and-reset round
//!   │                                                    finished = completed == rounds
//!   ├─► unlock
//!   ├─► finished ? detach every handler of the operation
//!   └─► callback(snapshot)
//! ```
//!
//! ## Rules
//! - Bookkeeping (round reset, teardown) is committed **before** the callback
//!   runs, so a failing or re-entrant callback cannot corrupt the next round.
//! - Occurrences arriving after the last round (already-snapshotted fan-outs)
//!   are ignored.

use std::sync::{Arc, Mutex};

use tracing::{debug, trace};

use super::collected::Collected;
use super::handle::{Registration, WaitHandle};
use super::round::Round;
use super::signals::SignalSet;
use crate::bus::{Handler, SignalBus};
use crate::error::CallbackError;
use crate::policies::KeepPolicy;
use crate::sync::lock;

struct AllState<V> {
    round: Round<V>,
    completed: usize,
    finished: bool,
}

/// State record of one conjunctive waiting operation.
pub(crate) struct AllOp<B: SignalBus, F> {
    signals: SignalSet,
    keep: KeepPolicy,
    /// `None` = unlimited rounds.
    rounds: Option<usize>,
    state: Mutex<AllState<B::Value>>,
    reg: Arc<Registration<B>>,
    callback: F,
}

impl<B, F> AllOp<B, F>
where
    B: SignalBus,
    F: Fn(Collected<B::Value>) -> Result<(), CallbackError> + Send + Sync + 'static,
{
    /// Registers the operation on `bus` and returns its handle.
    pub(crate) fn register(
        bus: &Arc<B>,
        operation: &'static str,
        signals: SignalSet,
        keep: KeepPolicy,
        rounds: Option<usize>,
        callback: F,
    ) -> WaitHandle<B> {
        let reg = Registration::conjunctive(bus, operation);
        let op = Arc::new(Self {
            state: Mutex::new(AllState {
                round: Round::new(signals.len()),
                completed: 0,
                finished: false,
            }),
            signals,
            keep,
            rounds,
            reg: Arc::clone(&reg),
            callback,
        });

        reg.attach(bus, &op.signals, false, |index| {
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

        let (collected, round, finished) = {
            let mut state = lock(&self.state);
            if state.finished {
                return Ok(());
            }
            state.round.record(index, payload, self.keep);
            trace!(
                operation = self.reg.operation(),
                signal = self.signals.name(index),
                remaining = state.round.remaining(),
                "occurrence recorded"
            );
            if !state.round.is_complete() {
                return Ok(());
            }

            state.completed += 1;
            let completed = state.completed;
            let finished = self.rounds.is_some_and(|n| completed >= n);
            state.finished = finished;
            (state.round.take(&self.signals), completed, finished)
        };

        if finished {
            self.reg.detach();
        }
        debug!(
            operation = self.reg.operation(),
            round,
            finished,
            "round completed"
        );
        (self.callback)(collected)
    }
}
