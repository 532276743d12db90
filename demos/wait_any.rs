//! # Example: wait_any
//!
//! Waits for whichever of several signals fires first, with a deadline.
//!
//! Demonstrates how to:
//! - Await [`Combinator::wait_any`] from async code.
//! - Cancel a pending wait through a [`CancellationToken`].
//! - Race a wait against `tokio::time::timeout`.
//!
//! ## Flow
//! ```text
//! main ──► wait_any([done, failed])
//!   └─► worker (after 50ms) ──► publish(failed, [42])
//!         └─► Ok(Occurrence { signal: failed, payload: [42] })
//! main ──► wait_any([done]) under a 100ms timeout ──► Elapsed (handlers detached)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example wait_any
//! ```

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use waitset::{Combinator, Emitter, SignalBus};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let on = Combinator::new(Emitter::<u32>::new());
    let token = CancellationToken::new();

    // 1. A worker reports its outcome a bit later
    let worker = on.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        if let Err(e) = worker.publish("failed", &[42]) {
            eprintln!("[worker] publish failed: {e}");
        }
    });

    // 2. Whichever signal fires first wins
    let first = on.wait_any(["done", "failed"], &token).await?;
    println!("[main] {} with {:?}", first.signal, first.payload);

    // 3. Nobody publishes `done` again: give up after 100ms
    let late = tokio::time::timeout(
        Duration::from_millis(100),
        on.wait_any(["done"], &token),
    )
    .await;
    println!("[main] second wait timed out: {}", late.is_err());
    println!("[main] handlers left on done: {}", on.handler_count("done"));
    Ok(())
}
