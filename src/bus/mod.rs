//! Signal bus: the publish/subscribe contract and its built-in implementation.
//!
//! ## Contents
//! - [`SignalBus`] the four primitives the combinators consume
//! - [`Handler`], [`SubscriptionId`] handler type and registration token
//! - [`Emitter`] in-process bus with synchronous, ordered fan-out
//! - [`EmitterConfig`] emitter settings (leak warning threshold)
//!
//! Any type implementing [`SignalBus`] can be wrapped by
//! [`Combinator`](crate::Combinator); [`Emitter`] is only the default choice.

mod config;
mod emitter;
mod signal;

pub use config::EmitterConfig;
pub use emitter::Emitter;
pub use signal::{Handler, SignalBus, SubscriptionId};
