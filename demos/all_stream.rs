//! # Example: all_stream
//!
//! Consumes completed rounds of an unlimited conjunctive wait as a stream.
//!
//! ## Flow
//! ```text
//! publisher task ──► publish(cpu) / publish(mem) ...
//!     └─► all(cpu, mem) ──► RoundStream ──► main: while let Some(round)
//! publisher task ──► clear(mem) ──► operation detached ──► stream ends
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example all_stream
//! ```

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use waitset::{Combinator, Emitter, KeepPolicy, SignalBus};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let bus = Arc::new(Emitter::<u64>::new());
    let on = Combinator::from_arc(Arc::clone(&bus));
    let mut rounds = on.all_stream(["cpu", "mem"], KeepPolicy::Last)?;

    // 1. Samples arrive independently; a round needs one of each
    tokio::spawn(async move {
        for tick in 1..=3u64 {
            tokio::time::sleep(Duration::from_millis(20)).await;
            let _ = bus.publish("cpu", &[tick * 10]);
            let _ = bus.publish("mem", &[tick * 100]);
        }
        // 2. Dropping one signal's handler ends the whole wait
        bus.clear("mem");
    });

    while let Some(round) = rounds.next().await {
        println!("[sample] cpu={:?} mem={:?}", &round["cpu"], &round["mem"]);
    }
    println!("[done] stream ended");
    Ok(())
}
