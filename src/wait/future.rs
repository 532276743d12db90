//! # One-shot async waits.
//!
//! [`Combinator::wait_all`] and [`Combinator::wait_any`] register an
//! `all_once` / `any_once` operation and resolve with its result.
//!
//! ## Outcomes
//! ```text
//! round / occurrence delivered ─► Ok(value)
//! token cancelled              ─► Err(WaitError::Cancelled)   (handlers detached)
//! any handler removed externally ─► Err(WaitError::Detached)
//! future dropped               ─► handlers detached
//! ```
//!
//! No timeout is built in; race the future against a timer instead:
//! ```rust
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use waitset::{Combinator, Emitter, KeepPolicy, SignalBus};
//!
//! let on = Combinator::new(Emitter::<u8>::new());
//! let token = CancellationToken::new();
//! let res = tokio::time::timeout(
//!     Duration::from_millis(10),
//!     on.wait_all(["a", "b"], KeepPolicy::Last, &token),
//! )
//! .await;
//! assert!(res.is_err()); // nobody published
//! assert_eq!(on.handler_count("a"), 0);
//! # }
//! ```

use std::sync::Mutex;

use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::bus::SignalBus;
use crate::core::{Collected, Combinator, Occurrence};
use crate::error::WaitError;
use crate::policies::KeepPolicy;
use crate::sync::lock;

impl<B: SignalBus> Combinator<B> {
    /// Waits until every signal has fired once and returns the round.
    ///
    /// # Errors
    /// - [`WaitError::InvalidArgument`] for an empty or duplicated signal list
    /// - [`WaitError::Cancelled`] if `token` is cancelled first
    /// - [`WaitError::Detached`] if the handlers are removed by someone else
    pub async fn wait_all<I, S>(
        &self,
        signals: I,
        keep: KeepPolicy,
        token: &CancellationToken,
    ) -> Result<Collected<B::Value>, WaitError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (tx, rx) = oneshot::channel();
        let tx = Mutex::new(Some(tx));
        let handle = self.all_once(signals, keep, move |collected| {
            if let Some(tx) = lock(&tx).take() {
                let _ = tx.send(collected);
            }
            Ok(())
        })?;
        let _guard = handle.into_guard();

        tokio::select! {
            res = rx => res.map_err(|_| WaitError::Detached),
            () = token.cancelled() => Err(WaitError::Cancelled),
        }
    }

    /// Waits for the first occurrence of any signal.
    ///
    /// # Errors
    /// Same as [`Combinator::wait_all`].
    pub async fn wait_any<I, S>(
        &self,
        signals: I,
        token: &CancellationToken,
    ) -> Result<Occurrence<B::Value>, WaitError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (tx, rx) = oneshot::channel();
        let tx = Mutex::new(Some(tx));
        let handle = self.any_once(signals, move |signal, payload| {
            if let Some(tx) = lock(&tx).take() {
                let _ = tx.send(Occurrence::new(signal, payload.to_vec()));
            }
            Ok(())
        })?;
        let _guard = handle.into_guard();

        tokio::select! {
            res = rx => res.map_err(|_| WaitError::Detached),
            () = token.cancelled() => Err(WaitError::Cancelled),
        }
    }
}
