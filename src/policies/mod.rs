//! Round policies.
//!
//! This module groups the knobs that control **which payload** a round keeps
//! and **what is evicted** when cached rounds pile up.
//!
//! ## Contents
//! - [`KeepPolicy`]    first-seen vs last-seen payload within a round
//! - [`CachePolicy`]   capacity of the `all_cached` round queue
//! - [`DiscardPolicy`] which round is evicted when that capacity is exceeded
//!
//! ## Quick wiring
//! ```text
//! Combinator::all / all_once / all_many ─► KeepPolicy
//! Combinator::all_cached                ─► CachePolicy { limit, discard: DiscardPolicy }
//! ```
//!
//! ## Defaults
//! - `KeepPolicy::Last`.
//! - `CachePolicy::default()` → unbounded, `DiscardPolicy::Oldest`.

mod cache;
mod discard;
mod keep;

pub use cache::CachePolicy;
pub use discard::DiscardPolicy;
pub use keep::KeepPolicy;
