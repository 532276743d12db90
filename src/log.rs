//! # LogWriter — ready-made logging callbacks
//!
//! Builds callbacks that log what they receive through `tracing` at `info`.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! INFO waitset::log: round completed name="startup" round={"config": ["ok"], "db": ["up"]}
//! INFO waitset::log: signal fired name="errors" signal="timeout" payload=[3]
//! ```

use std::fmt::Debug;

use tracing::info;

use crate::core::Collected;
use crate::error::CallbackError;

/// Factory of logging callbacks.
#[derive(Clone, Copy, Debug)]
pub struct LogWriter {
    name: &'static str,
}

impl LogWriter {
    /// Construct a new [`LogWriter`]; `name` tags every line.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }

    /// Callback for the `all*` family.
    pub fn round<V>(
        self,
    ) -> impl Fn(Collected<V>) -> Result<(), CallbackError> + Send + Sync + 'static
    where
        V: Debug + 'static,
    {
        move |round: Collected<V>| -> Result<(), CallbackError> {
            info!(name = self.name, round = ?round, "round completed");
            Ok(())
        }
    }

    /// Callback for the `any*` family.
    pub fn occurrence<V>(
        self,
    ) -> impl Fn(&str, &[V]) -> Result<(), CallbackError> + Send + Sync + 'static
    where
        V: Debug + 'static,
    {
        move |signal: &str, payload: &[V]| -> Result<(), CallbackError> {
            info!(name = self.name, signal, payload = ?payload, "signal fired");
            Ok(())
        }
    }
}
