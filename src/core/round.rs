//! # Pending set of one conjunctive round.
//!
//! A [`Round`] has one slot per signal of its [`SignalSet`] and a count of
//! slots still empty, so "is the round complete" is an O(1) check.
//!
//! ```text
//! set = [a, b, c]      slots = [None, None, None]   remaining = 3
//! record(1, [y])   ──► slots = [None, [y], None]    remaining = 2
//! record(1, [y'])  ──► Last: slot replaced / First: ignored, remaining = 2
//! ```

use super::collected::Collected;
use super::signals::SignalSet;
use crate::policies::KeepPolicy;

/// In-progress round: recorded payloads plus the remaining-pending counter.
#[derive(Debug)]
pub(crate) struct Round<V> {
    slots: Vec<Option<Vec<V>>>,
    remaining: usize,
}

impl<V> Round<V> {
    /// Creates an empty round sized for `len` signals.
    pub(crate) fn new(len: usize) -> Self {
        let mut slots = Vec::with_capacity(len);
        slots.resize_with(len, || None);
        Self {
            slots,
            remaining: len,
        }
    }

    /// True if slot `index` already holds a payload.
    #[inline]
    pub(crate) fn has(&self, index: usize) -> bool {
        self.slots[index].is_some()
    }

    /// True once every signal of the set has been recorded.
    #[inline]
    pub(crate) fn is_complete(&self) -> bool {
        self.remaining == 0
    }

    /// Number of signals still pending.
    #[inline]
    pub(crate) fn remaining(&self) -> usize {
        self.remaining
    }

    /// Records `payload` for slot `index` under `keep`.
    ///
    /// Returns `true` if the slot was stored (first fill or overwrite).
    pub(crate) fn record(&mut self, index: usize, payload: &[V], keep: KeepPolicy) -> bool
    where
        V: Clone,
    {
        let slot = &mut self.slots[index];
        match slot {
            None => {
                *slot = Some(payload.to_vec());
                self.remaining -= 1;
                true
            }
            Some(_) if keep.overwrites() => {
                *slot = Some(payload.to_vec());
                true
            }
            Some(_) => false,
        }
    }

    /// Snapshots the completed round and resets `self` for the next one.
    pub(crate) fn take(&mut self, signals: &SignalSet) -> Collected<V> {
        let fresh = Round::new(self.slots.len());
        std::mem::replace(self, fresh).into_collected(signals)
    }

    /// Consumes a completed round.
    pub(crate) fn into_collected(self, signals: &SignalSet) -> Collected<V> {
        debug_assert!(self.is_complete());
        let payloads = self.slots.into_iter().map(Option::unwrap_or_default).collect();
        Collected::new(signals.clone(), payloads)
    }
}
