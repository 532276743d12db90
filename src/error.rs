//! Error types used by the combinator layer and the caller callbacks.
//!
//! This module defines three error enums:
//!
//! - [`WaitError`] — errors raised when registering or awaiting a waiting operation.
//! - [`CallbackError`] — errors returned by caller-supplied callbacks.
//! - [`PublishError`] — errors surfaced to the publisher of an occurrence.
//!
//! All types provide helper methods (`as_label`, `as_message`) for logging/metrics.
//!
//! ## Propagation
//! ```text
//! publish(signal) ──► handler ──► combinator bookkeeping (committed)
//!                                      └─► callback() ── Err(CallbackError)
//!                                                            │
//! publish(signal) ◄── Err(PublishError::Callback { signal, source }) ◄─┘
//! ```

use thiserror::Error;

/// # Errors produced when registering or awaiting a waiting operation.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WaitError {
    /// The operation was called with arguments it cannot honor
    /// (empty signal set, duplicate signal names, zero count).
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the arguments.
        reason: String,
    },

    /// An async wait was cancelled through its cancellation token.
    #[error("wait cancelled")]
    Cancelled,

    /// The operation's handlers were removed before it could complete.
    #[error("wait detached before completion")]
    Detached,
}

impl WaitError {
    /// Shorthand for [`WaitError::InvalidArgument`].
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        WaitError::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use waitset::WaitError;
    ///
    /// assert_eq!(WaitError::Cancelled.as_label(), "wait_cancelled");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            WaitError::InvalidArgument { .. } => "wait_invalid_argument",
            WaitError::Cancelled => "wait_cancelled",
            WaitError::Detached => "wait_detached",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            WaitError::InvalidArgument { reason } => format!("invalid argument: {reason}"),
            WaitError::Cancelled => "cancelled by token".to_string(),
            WaitError::Detached => "handlers removed before completion".to_string(),
        }
    }
}

/// # Errors returned by caller-supplied callbacks.
///
/// The combinator never swallows them: they travel back to whoever published
/// the occurrence that triggered the callback.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallbackError {
    /// The callback failed; the caller may keep publishing.
    #[error("callback failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The callback hit a condition the caller considers unrecoverable.
    #[error("fatal callback error: {error}")]
    Fatal {
        /// The underlying error message.
        error: String,
    },
}

impl CallbackError {
    /// Creates a [`CallbackError::Fail`].
    pub fn fail(error: impl Into<String>) -> Self {
        CallbackError::Fail {
            error: error.into(),
        }
    }

    /// Creates a [`CallbackError::Fatal`].
    pub fn fatal(error: impl Into<String>) -> Self {
        CallbackError::Fatal {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use waitset::CallbackError;
    ///
    /// assert_eq!(CallbackError::fail("boom").as_label(), "callback_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            CallbackError::Fail { .. } => "callback_failed",
            CallbackError::Fatal { .. } => "callback_fatal",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            CallbackError::Fail { error } => format!("error: {error}"),
            CallbackError::Fatal { error } => format!("fatal: {error}"),
        }
    }

    /// True for [`CallbackError::Fatal`].
    ///
    /// The combinator treats both variants the same way; the distinction is
    /// for the publisher deciding what to do next.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CallbackError::Fatal { .. })
    }
}

impl From<String> for CallbackError {
    fn from(error: String) -> Self {
        CallbackError::Fail { error }
    }
}

impl From<&str> for CallbackError {
    fn from(error: &str) -> Self {
        CallbackError::Fail {
            error: error.to_string(),
        }
    }
}

impl From<PublishError> for CallbackError {
    /// A callback that publishes re-entrantly forwards the nested failure as its own.
    fn from(err: PublishError) -> Self {
        match err {
            PublishError::Callback { source, .. } => source,
        }
    }
}

/// # Errors surfaced to the publisher of an occurrence.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PublishError {
    /// A handler registered for `signal` returned an error.
    ///
    /// Fan-out stops at the failing handler; handlers registered after it
    /// do not see this occurrence.
    #[error("handler for signal {signal:?} failed: {source}")]
    Callback {
        /// Signal whose occurrence triggered the failing handler.
        signal: String,
        /// The callback's error.
        #[source]
        source: CallbackError,
    },
}

impl PublishError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            PublishError::Callback { .. } => "publish_callback_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            PublishError::Callback { signal, source } => {
                format!("signal={signal} {}", source.as_message())
            }
        }
    }

    /// The callback error behind this failure.
    pub fn callback_error(&self) -> &CallbackError {
        match self {
            PublishError::Callback { source, .. } => source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        assert_eq!(WaitError::invalid("x").as_label(), "wait_invalid_argument");
        assert_eq!(WaitError::Detached.as_label(), "wait_detached");
        assert_eq!(CallbackError::fatal("x").as_label(), "callback_fatal");
        let err = PublishError::Callback {
            signal: "a".into(),
            source: CallbackError::fail("boom"),
        };
        assert_eq!(err.as_label(), "publish_callback_failed");
    }

    #[test]
    fn test_callback_error_conversions() {
        let err: CallbackError = "boom".into();
        assert_eq!(err, CallbackError::fail("boom"));
        assert!(!err.is_fatal());
        assert!(CallbackError::fatal("nope").is_fatal());
    }

    #[test]
    fn test_publish_error_message_names_signal() {
        let err = PublishError::Callback {
            signal: "ready".into(),
            source: CallbackError::fail("boom"),
        };
        assert_eq!(err.as_message(), "signal=ready error: boom");
        assert_eq!(err.callback_error(), &CallbackError::fail("boom"));
        assert!(err.to_string().contains("\"ready\""));
    }
}
