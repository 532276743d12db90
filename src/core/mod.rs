//! Combinator core: multi-signal waiting strategies.
//!
//! The only entry point is [`Combinator`]; everything else here is the
//! per-operation bookkeeping behind it.
//!
//! ## Wiring
//! ```text
//! Combinator::all*/any*(signals, ..)
//!     │
//!     ├─► SignalSet::new(signals)?              validate (non-empty, distinct)
//!     ├─► Registration                          (signal, SubscriptionId) list
//!     ├─► Arc<{AllOp | CachedOp | AnyOp}>       one state record per operation
//!     │       └─ captured by one handler per signal
//!     └─► WaitHandle                            external detach
//! ```
//!
//! Internal modules:
//! - [`signals`]: validated signal sets;
//! - [`round`]: fixed-size pending set of one conjunctive round;
//! - [`collected`]: values handed to callbacks;
//! - [`handle`]: registration record, [`WaitHandle`] and [`DetachGuard`];
//! - [`all`]: `all`, `all_once`, `all_many`;
//! - [`cached`]: `all_cached`;
//! - [`any`]: `any`, `any_once`, `any_many`;
//! - [`combinator`]: the public adapter.

mod all;
mod any;
mod cached;
mod collected;
mod combinator;
mod handle;
mod round;
mod signals;

pub use collected::{Collected, Occurrence};
pub use combinator::Combinator;
pub use handle::{DetachGuard, WaitHandle};
pub use signals::SignalSet;
