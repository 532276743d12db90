//! # Emitter configuration.
//!
//! Provides [`EmitterConfig`], the settings of the built-in [`Emitter`](crate::Emitter).
//!
//! ## Sentinel values
//! - `max_handlers = 0` → unlimited (no leak warning)

/// Configuration for the built-in in-process bus.
///
/// ## Field semantics
/// - `max_handlers`: per-signal handler count above which a leak warning is
///   logged (`0` = never warn)
#[derive(Clone, Debug)]
pub struct EmitterConfig {
    /// Per-signal handler threshold for the leak warning.
    ///
    /// Crossing it does not reject the subscription; it logs one `warn!`
    /// per crossing. Dropping back below re-arms the warning.
    pub max_handlers: usize,
}

impl EmitterConfig {
    /// Returns the handler threshold as an `Option`.
    ///
    /// - `None` → unlimited
    /// - `Some(n)` → warn when a signal gets more than `n` handlers
    #[inline]
    pub fn max_handlers_limit(&self) -> Option<usize> {
        if self.max_handlers == 0 {
            None
        } else {
            Some(self.max_handlers)
        }
    }
}

impl Default for EmitterConfig {
    /// Default configuration:
    ///
    /// - `max_handlers = 10`
    fn default() -> Self {
        Self { max_handlers: 10 }
    }
}
