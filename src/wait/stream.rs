//! # Streams over unlimited waits.
//!
//! - [`SignalStream`] yields every [`Occurrence`] seen by an `any` operation.
//! - [`RoundStream`] yields every [`Collected`] round of an `all` operation.
//!
//! ```text
//! publish ─► handler ─► callback ─► unbounded queue ─► poll_next()
//! ```
//!
//! ## Rules
//! - Items are buffered without bound; the publisher never waits on the consumer.
//! - Dropping the stream detaches its handlers.
//! - After `detach()` (or external removal) the stream yields what is still
//!   buffered, then ends. A [`RoundStream`] ends as soon as the handler of any
//!   one signal is removed.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;

use crate::bus::SignalBus;
use crate::core::{Collected, Combinator, DetachGuard, Occurrence};
use crate::error::WaitError;
use crate::policies::KeepPolicy;

/// Stream of occurrences of any of a set of signals.
pub struct SignalStream<B: SignalBus> {
    rx: mpsc::UnboundedReceiver<Occurrence<B::Value>>,
    guard: DetachGuard<B>,
}

impl<B: SignalBus> SignalStream<B> {
    /// Stops observing; buffered occurrences are still yielded.
    pub fn detach(&self) -> bool {
        self.guard.handle().detach()
    }
}

// never pin-projected
impl<B: SignalBus> Unpin for SignalStream<B> {}

impl<B: SignalBus> Stream for SignalStream<B> {
    type Item = Occurrence<B::Value>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

/// Stream of completed rounds of a conjunctive wait.
pub struct RoundStream<B: SignalBus> {
    rx: mpsc::UnboundedReceiver<Collected<B::Value>>,
    guard: DetachGuard<B>,
}

impl<B: SignalBus> RoundStream<B> {
    /// Stops observing; buffered rounds are still yielded.
    pub fn detach(&self) -> bool {
        self.guard.handle().detach()
    }
}

impl<B: SignalBus> Unpin for RoundStream<B> {}

impl<B: SignalBus> Stream for RoundStream<B> {
    type Item = Collected<B::Value>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

impl<B: SignalBus> Combinator<B> {
    /// Streams every occurrence of any signal in `signals`.
    ///
    /// # Errors
    /// [`WaitError::InvalidArgument`] for an empty or duplicated signal list.
    pub fn any_stream<I, S>(&self, signals: I) -> Result<SignalStream<B>, WaitError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = self.any(signals, move |signal, payload| {
            let _ = tx.send(Occurrence::new(signal, payload.to_vec()));
            Ok(())
        })?;
        Ok(SignalStream {
            rx,
            guard: handle.into_guard(),
        })
    }

    /// Streams every completed round of `all(signals, keep)`.
    ///
    /// # Errors
    /// [`WaitError::InvalidArgument`] for an empty or duplicated signal list.
    pub fn all_stream<I, S>(
        &self,
        signals: I,
        keep: KeepPolicy,
    ) -> Result<RoundStream<B>, WaitError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = self.all(signals, keep, move |collected| {
            let _ = tx.send(collected);
            Ok(())
        })?;
        Ok(RoundStream {
            rx,
            guard: handle.into_guard(),
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use super::*;
    use crate::bus::Emitter;

    #[tokio::test]
    async fn test_any_stream_yields_in_arrival_order() {
        let on = Combinator::new(Emitter::<&'static str>::new());
        let stream = on.any_stream(["a", "b"]).unwrap();

        on.publish("b", &["1"]).unwrap();
        on.publish("x", &["ignored"]).unwrap();
        on.publish("a", &["2"]).unwrap();
        stream.detach();
        on.publish("a", &["3"]).unwrap();

        let items: Vec<_> = stream.collect().await;
        assert_eq!(
            items,
            vec![Occurrence::new("b", vec!["1"]), Occurrence::new("a", vec!["2"])]
        );
    }

    #[tokio::test]
    async fn test_all_stream_yields_rounds() {
        let on = Combinator::new(Emitter::<u8>::new());
        let mut rounds = on.all_stream(["a", "b"], KeepPolicy::Last).unwrap();

        for (signal, value) in [("a", 1), ("b", 2), ("a", 3), ("a", 4), ("b", 5)] {
            on.publish(signal, &[value]).unwrap();
        }

        let first = rounds.next().await.unwrap();
        let second = rounds.next().await.unwrap();
        assert_eq!(first.get("a"), Some(&[1][..]));
        assert_eq!(second.get("a"), Some(&[4][..]));
        assert_eq!(second.get("b"), Some(&[5][..]));
    }

    #[tokio::test]
    async fn test_all_stream_ends_when_one_signal_is_cleared() {
        let on = Combinator::new(Emitter::<u8>::new());
        let rounds = on.all_stream(["a", "b"], KeepPolicy::Last).unwrap();

        on.publish("a", &[1]).unwrap();
        on.publish("b", &[2]).unwrap();
        on.publish("a", &[3]).unwrap();
        on.clear("b");

        let items: Vec<_> = rounds.collect().await;
        assert_eq!(items.len(), 1);
        assert_eq!(on.handler_count("a"), 0);
    }

    #[tokio::test]
    async fn test_dropping_stream_detaches() {
        let on = Combinator::new(Emitter::<u8>::new());
        let stream = on.any_stream(["a"]).unwrap();
        assert_eq!(on.handler_count("a"), 1);
        drop(stream);
        assert_eq!(on.handler_count("a"), 0);
    }
}
