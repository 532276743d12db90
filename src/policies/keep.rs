//! # Duplicate-in-round policy for conjunctive waits.
//!
//! [`KeepPolicy`] decides which payload a round keeps when one signal fires
//! more than once before the round completes.
//!
//! ```text
//! a(x1) a(x2) b(y1)
//!   KeepPolicy::Last  → { a: [x2], b: [y1] }   (default)
//!   KeepPolicy::First → { a: [x1], b: [y1] }
//! ```

/// Which occurrence of a repeated signal a round keeps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeepPolicy {
    /// The most recent occurrence before completion wins (default).
    #[default]
    Last,
    /// The first occurrence wins; later ones in the same round are ignored.
    First,
}

impl KeepPolicy {
    /// Maps a `use_first` flag onto a policy.
    #[inline]
    pub fn from_use_first(use_first: bool) -> Self {
        if use_first {
            KeepPolicy::First
        } else {
            KeepPolicy::Last
        }
    }

    /// True if a new occurrence should replace an already recorded one.
    #[inline]
    pub fn overwrites(self) -> bool {
        matches!(self, KeepPolicy::Last)
    }
}
