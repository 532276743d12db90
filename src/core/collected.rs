//! # Values handed to callbacks.
//!
//! - [`Collected`] one completed conjunctive round: signal name → payload,
//!   exactly one entry per signal of the set.
//! - [`Occurrence`] one firing seen by a disjunctive wait (used by the
//!   async adapters; plain `any*` callbacks get `(&str, &[V])` directly).

use std::collections::HashMap;
use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use super::signals::SignalSet;

/// Payloads of one completed round, keyed by signal name.
///
/// Entries are stored in signal-set order.
#[derive(Clone)]
pub struct Collected<V> {
    signals: SignalSet,
    payloads: Vec<Vec<V>>,
}

impl<V> Collected<V> {
    pub(crate) fn new(signals: SignalSet, payloads: Vec<Vec<V>>) -> Self {
        debug_assert_eq!(signals.len(), payloads.len());
        Self { signals, payloads }
    }

    /// Payload recorded for `signal`, if it belongs to the set.
    pub fn get(&self, signal: &str) -> Option<&[V]> {
        self.signals
            .index_of(signal)
            .map(|i| self.payloads[i].as_slice())
    }

    /// Number of entries (equals the size of the signal set).
    #[inline]
    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    /// Always `false` for a completed round.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    /// The signal set this round was collected for.
    pub fn signals(&self) -> &SignalSet {
        &self.signals
    }

    /// `(signal, payload)` pairs in signal-set order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[V])> + '_ {
        self.signals
            .iter()
            .zip(self.payloads.iter().map(Vec::as_slice))
    }

    /// Converts into an owned map.
    pub fn into_map(self) -> HashMap<String, Vec<V>> {
        self.signals
            .iter()
            .map(str::to_string)
            .zip(self.payloads)
            .collect()
    }
}

impl<V> Index<&str> for Collected<V> {
    type Output = [V];

    /// # Panics
    /// If `signal` is not part of the set.
    fn index(&self, signal: &str) -> &[V] {
        match self.get(signal) {
            Some(payload) => payload,
            None => panic!("signal {signal:?} is not part of {}", self.signals),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for Collected<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V: PartialEq> PartialEq for Collected<V> {
    fn eq(&self, other: &Self) -> bool {
        self.signals == other.signals && self.payloads == other.payloads
    }
}

/// One occurrence observed by a disjunctive wait.
#[derive(Clone, Debug, PartialEq)]
pub struct Occurrence<V> {
    /// Signal that fired.
    pub signal: Arc<str>,
    /// Its payload.
    pub payload: Vec<V>,
}

impl<V> Occurrence<V> {
    /// Creates an occurrence.
    pub fn new(signal: impl Into<Arc<str>>, payload: Vec<V>) -> Self {
        Self {
            signal: signal.into(),
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Collected<&'static str> {
        let set = SignalSet::new(["a", "b"]).unwrap();
        Collected::new(set, vec![vec!["x1"], vec!["y1", "y2"]])
    }

    #[test]
    fn test_lookup_by_name() {
        let c = sample();
        assert_eq!(c.len(), 2);
        assert_eq!(c.get("a"), Some(&["x1"][..]));
        assert_eq!(&c["b"], &["y1", "y2"]);
        assert_eq!(c.get("z"), None);
    }

    #[test]
    fn test_iter_in_set_order_and_into_map() {
        let c = sample();
        let names: Vec<&str> = c.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b"]);

        let map = c.into_map();
        assert_eq!(map["a"], vec!["x1"]);
        assert_eq!(map["b"], vec!["y1", "y2"]);
    }

    #[test]
    fn test_debug_is_map_like() {
        assert_eq!(format!("{:?}", sample()), r#"{"a": ["x1"], "b": ["y1", "y2"]}"#);
    }

    #[test]
    #[should_panic(expected = "not part of")]
    fn test_index_unknown_signal_panics() {
        let _ = &sample()["nope"];
    }
}
