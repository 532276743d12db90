//! # Cached conjunctive wait: `all_cached`.
//!
//! Repeated occurrences of an already-satisfied signal are never dropped:
//! they land in the oldest in-progress round still missing that signal, or
//! open a new round at the back of the queue.
//!
//! ## Architecture
//! ```text
//! occurrence(S)
//!   ├─► first round (oldest → newest) without S ? ─► record there
//!   │        └─ none ─► push new round {S} ─► len > limit ? ─► evict (Oldest | Newest)
//!   ├─► front round complete ? ─► pop front
//!   └─► callback(front round)
//! ```
//!
//! ## Rules
//! - Eviction happens **before** the front-round completion check.
//! - Only the front round can complete: every round's recorded signals are a
//!   subset of the round before it, and both eviction policies keep that.
//! - Rounds are delivered strictly FIFO.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tracing::{debug, trace};

use super::collected::Collected;
use super::handle::{Registration, WaitHandle};
use super::round::Round;
use super::signals::SignalSet;
use crate::bus::{Handler, SignalBus};
use crate::error::CallbackError;
use crate::policies::{CachePolicy, DiscardPolicy, KeepPolicy};
use crate::sync::lock;

/// State record of one `all_cached` operation.
pub(crate) struct CachedOp<B: SignalBus, F> {
    signals: SignalSet,
    policy: CachePolicy,
    /// In-progress rounds, oldest first.
    rounds: Mutex<VecDeque<Round<B::Value>>>,
    reg: Arc<Registration<B>>,
    callback: F,
}

impl<B, F> CachedOp<B, F>
where
    B: SignalBus,
    F: Fn(Collected<B::Value>) -> Result<(), CallbackError> + Send + Sync + 'static,
{
    /// Registers the operation on `bus` and returns its handle.
    pub(crate) fn register(
        bus: &Arc<B>,
        signals: SignalSet,
        policy: CachePolicy,
        callback: F,
    ) -> WaitHandle<B> {
        let reg = Registration::conjunctive(bus, "all_cached");
        let op = Arc::new(Self {
            signals,
            policy,
            rounds: Mutex::new(VecDeque::new()),
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

        let (collected, pending) = {
            let mut rounds = lock(&self.rounds);
            match rounds.iter().position(|r| !r.has(index)) {
                Some(pos) => {
                    rounds[pos].record(index, payload, KeepPolicy::First);
                }
                None => {
                    let mut round = Round::new(self.signals.len());
                    round.record(index, payload, KeepPolicy::First);
                    rounds.push_back(round);
                    self.enforce_limit(&mut rounds);
                }
            }
            trace!(
                signal = self.signals.name(index),
                depth = rounds.len(),
                "cached occurrence recorded"
            );

            let collected = if rounds.front().is_some_and(Round::is_complete) {
                rounds.pop_front().map(|r| r.into_collected(&self.signals))
            } else {
                None
            };
            (collected, rounds.len())
        };

        match collected {
            Some(collected) => {
                debug!(operation = "all_cached", pending, "round completed");
                (self.callback)(collected)
            }
            None => Ok(()),
        }
    }

    fn enforce_limit(&self, rounds: &mut VecDeque<Round<B::Value>>) {
        let Some(limit) = self.policy.limit_opt() else {
            return;
        };
        while rounds.len() > limit {
            let evicted = match self.policy.discard {
                DiscardPolicy::Oldest => rounds.pop_front(),
                DiscardPolicy::Newest => rounds.pop_back(),
            };
            debug!(
                operation = "all_cached",
                policy = self.policy.discard.as_str(),
                limit,
                missing = evicted.map_or(0, |r| r.remaining()),
                "in-progress round evicted"
            );
        }
    }
}
