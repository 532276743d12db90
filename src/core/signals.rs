//! # Validated signal sets.
//!
//! A [`SignalSet`] is the event-set of one waiting operation: non-empty,
//! duplicate-free, in caller order. Each member keeps a fixed index, which is
//! what rounds use instead of keying state by name.

use std::fmt;
use std::sync::Arc;

use crate::error::WaitError;

/// Ordered, non-empty set of distinct signal names.
///
/// Cheap to clone (shares one allocation).
#[derive(Clone, PartialEq, Eq)]
pub struct SignalSet {
    names: Arc<[Arc<str>]>,
}

impl SignalSet {
    /// Validates `signals` into a set.
    ///
    /// # Errors
    /// [`WaitError::InvalidArgument`] if `signals` is empty or names a signal twice.
    ///
    /// # Example
    /// ```
    /// use waitset::SignalSet;
    ///
    /// let set = SignalSet::new(["ready", "loaded"]).unwrap();
    /// assert_eq!(set.len(), 2);
    /// assert_eq!(set.index_of("loaded"), Some(1));
    /// assert!(SignalSet::new(Vec::<String>::new()).is_err());
    /// ```
    pub fn new<I, S>(signals: I) -> Result<Self, WaitError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: Vec<Arc<str>> = Vec::new();
        for signal in signals {
            let signal = signal.as_ref();
            if names.iter().any(|n| n.as_ref() == signal) {
                return Err(WaitError::invalid(format!(
                    "duplicate signal name {signal:?}"
                )));
            }
            names.push(Arc::from(signal));
        }
        if names.is_empty() {
            return Err(WaitError::invalid("signal set is empty"));
        }
        Ok(Self {
            names: names.into(),
        })
    }

    /// Number of signals in the set (never zero).
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always `false`; provided for API symmetry with collections.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Name at `index`.
    ///
    /// # Panics
    /// If `index >= self.len()`.
    #[inline]
    pub fn name(&self, index: usize) -> &str {
        &self.names[index]
    }

    /// Index of `signal` in the set.
    pub fn index_of(&self, signal: &str) -> Option<usize> {
        self.names.iter().position(|n| n.as_ref() == signal)
    }

    /// Names in set order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(|n| n.as_ref())
    }

    /// Shared handle to the name at `index`.
    #[inline]
    pub(crate) fn shared_name(&self, index: usize) -> Arc<str> {
        Arc::clone(&self.names[index])
    }
}

impl fmt::Debug for SignalSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl fmt::Display for SignalSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, name) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}
