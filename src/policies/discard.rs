//! # Overflow policy for cached rounds.
//!
//! When a bounded [`CachePolicy`](crate::CachePolicy) would hold more
//! in-progress rounds than its limit, [`DiscardPolicy`] picks the victim:
//!
//! ```text
//! limit = 2, rounds = [r0, r1], new round r2 opened
//!   DiscardPolicy::Oldest → [r1, r2]   (fifo, default)
//!   DiscardPolicy::Newest → [r0, r1]   (lifo: r2 is dropped)
//! ```

/// Which in-progress round is evicted on overflow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DiscardPolicy {
    /// Evict the oldest in-progress round (default).
    #[default]
    Oldest,
    /// Evict the newest in-progress round, i.e. the one just opened.
    Newest,
}

impl DiscardPolicy {
    /// Short name used in logs.
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            DiscardPolicy::Oldest => "fifo",
            DiscardPolicy::Newest => "lifo",
        }
    }
}
