//! Async adapters over the callback-based combinators.
//!
//! ## Contents
//! - [`Combinator::wait_all`](crate::Combinator::wait_all),
//!   [`Combinator::wait_any`](crate::Combinator::wait_any) one-shot futures
//!   with `CancellationToken` support
//! - [`SignalStream`], [`RoundStream`] `futures::Stream`s over `any` / `all`
//!
//! The adapters never block the bus: callbacks only hand values over to a
//! channel, the awaiting side runs on the caller's runtime.

mod future;
mod stream;

pub use stream::{RoundStream, SignalStream};
