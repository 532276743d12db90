//! # waitset
//!
//! **waitset** lets you wait on *combinations* of named signals published on
//! a synchronous publish/subscribe bus: all of them (once, `n` times, forever,
//! or forever with repeats queued), or any of them (once, `n` times, forever).
//!
//! ## Architecture
//! ### Overview
//! ```text
//!                 ┌──────────────────────────────────────────────┐
//!   caller ─────► │ Combinator<B>                                │
//!                 │  all / all_once / all_many / all_cached      │
//!                 │  any / any_once / any_many                   │
//!                 │  wait_all / wait_any / any_stream / all_stream│
//!                 └──────┬──────────────────────────────┬────────┘
//!                        │ subscribe / unsubscribe       │ Deref / SignalBus
//!                        ▼                               ▼
//!                 ┌──────────────────────────────────────────────┐
//!                 │ B: SignalBus   (Emitter<V> built in)         │
//!                 │  signal ──► [h1, h2, ...]  synchronous fan-out│
//!                 └──────────────────────────────────────────────┘
//!                        │ publish(signal, payload)
//!                        ▼
//!       handler ──► per-operation state (Round / queue / counter)
//!                        └─► callback(Collected | signal, payload)
//! ```
//!
//! ### Round lifecycle (conjunctive waits)
//! ```text
//! set = [a, b]
//! a(x1) ──► pending {b}
//! b(y1) ──► pending {} ──► snapshot {a:[x1], b:[y1]}, reset, (teardown) ──► callback
//! a(x4) ──► pending {b}
//! a(x6) ──► pending {b}      (KeepPolicy::Last replaces x4)
//! b(y5) ──► snapshot {a:[x6], b:[y5]} ──► callback
//! ```
//!
//! ## Features
//! | Area            | Description                                                   | Key types / traits                          |
//! |-----------------|---------------------------------------------------------------|---------------------------------------------|
//! | **Bus**         | Publish/subscribe contract and an in-process implementation.  | [`SignalBus`], [`Emitter`]                  |
//! | **Combinators** | Conjunctive and disjunctive waits over a bus.                 | [`Combinator`], [`WaitHandle`]              |
//! | **Policies**    | Duplicate handling and cache bounds.                          | [`KeepPolicy`], [`CachePolicy`]             |
//! | **Async**       | Futures and streams with cancellation support.                | [`SignalStream`], [`RoundStream`]           |
//! | **Errors**      | Typed errors for arguments, callbacks and publishing.         | [`WaitError`], [`CallbackError`], [`PublishError`] |
//! | **Configuration** | Emitter settings.                                           | [`EmitterConfig`]                           |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//! use waitset::{CachePolicy, Combinator, Emitter, SignalBus};
//!
//! let on = Combinator::new(Emitter::<&'static str>::new());
//! let pairs = Arc::new(AtomicUsize::new(0));
//!
//! let counter = Arc::clone(&pairs);
//! on.all_cached(["req", "resp"], CachePolicy::bounded(16), move |round| {
//!     assert_eq!(round.len(), 2);
//!     counter.fetch_add(1, Ordering::SeqCst);
//!     Ok(())
//! })?;
//!
//! on.publish("req", &["r1"])?;
//! on.publish("req", &["r2"])?;   // queued for the next round
//! on.publish("resp", &["s1"])?;
//! on.publish("resp", &["s2"])?;
//! assert_eq!(pairs.load(Ordering::SeqCst), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
mod bus;
mod core;
mod error;
mod policies;
mod sync;
mod wait;

// ---- Public re-exports ----

pub use self::bus::{Emitter, EmitterConfig, Handler, SignalBus, SubscriptionId};
pub use self::core::{Collected, Combinator, DetachGuard, Occurrence, SignalSet, WaitHandle};
pub use self::error::{CallbackError, PublishError, WaitError};
pub use self::policies::{CachePolicy, DiscardPolicy, KeepPolicy};
pub use self::wait::{RoundStream, SignalStream};

// Optional: expose a simple built-in logging callback factory (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
mod log;
#[cfg(feature = "logging")]
pub use log::LogWriter;
