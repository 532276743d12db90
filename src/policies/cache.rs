//! # Cache bounds for `all_cached`.
//!
//! ## Sentinel values
//! - `limit = 0` → unbounded (no eviction)

use super::discard::DiscardPolicy;

/// Capacity and overflow behavior of the in-progress round queue.
///
/// ## Field semantics
/// - `limit`: maximum number of in-progress rounds (`0` = unbounded)
/// - `discard`: which round to evict once `limit` is exceeded
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CachePolicy {
    /// Maximum number of in-progress rounds (`0` = unbounded).
    pub limit: usize,
    /// Victim selection on overflow.
    pub discard: DiscardPolicy,
}

impl CachePolicy {
    /// No capacity bound.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// At most `limit` in-progress rounds, evicting the oldest on overflow.
    ///
    /// `limit = 0` is the same as [`CachePolicy::unbounded`].
    #[must_use]
    pub fn bounded(limit: usize) -> Self {
        Self {
            limit,
            discard: DiscardPolicy::Oldest,
        }
    }

    /// Replaces the discard policy.
    #[must_use]
    pub fn with_discard(mut self, discard: DiscardPolicy) -> Self {
        self.discard = discard;
        self
    }

    /// Returns the capacity as an `Option`.
    ///
    /// - `None` → unbounded
    /// - `Some(n)` → at most `n` in-progress rounds
    #[inline]
    pub fn limit_opt(&self) -> Option<usize> {
        if self.limit == 0 {
            None
        } else {
            Some(self.limit)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let policy = CachePolicy::default();
        assert_eq!(policy.limit_opt(), None);
        assert_eq!(policy.discard, DiscardPolicy::Oldest);
        assert_eq!(CachePolicy::unbounded(), policy);
    }

    #[test]
    fn test_bounded_with_discard() {
        let policy = CachePolicy::bounded(3).with_discard(DiscardPolicy::Newest);
        assert_eq!(policy.limit_opt(), Some(3));
        assert_eq!(policy.discard.as_str(), "lifo");
        assert_eq!(CachePolicy::bounded(0).limit_opt(), None);
    }
}
