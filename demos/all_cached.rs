//! # Example: all_cached
//!
//! Pairs requests with responses that may arrive in bursts.
//!
//! Demonstrates how to:
//! - Queue repeated occurrences with [`CachePolicy`] instead of overwriting them.
//! - Bound the queue and choose which round is dropped on overflow.
//! - Detach an unlimited wait with [`WaitHandle::detach`].
//!
//! ## Flow
//! ```text
//! req(r1) ──► round#1 {req}
//! req(r2) ──► round#2 {req}            (round#1 already has req)
//! req(r3) ──► round#3 {req} ──► limit 2 exceeded ──► drop round#1
//! resp(s1) ─► round#2 complete ──► callback {req:[r2], resp:[s1]}
//! resp(s2) ─► round#3 complete ──► callback {req:[r3], resp:[s2]}
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example all_cached
//! ```

use waitset::{CachePolicy, Combinator, DiscardPolicy, Emitter, SignalBus};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Combinator over the built-in emitter
    let on = Combinator::new(Emitter::<String>::new());

    // 2. Keep at most two rounds in flight, dropping the oldest on overflow
    let policy = CachePolicy::bounded(2).with_discard(DiscardPolicy::Oldest);
    let handle = on.all_cached(["req", "resp"], policy, |round| {
        println!("[pair] {} -> {}", round["req"][0], round["resp"][0]);
        Ok(())
    })?;

    // 3. A burst of requests, then the responses
    for r in ["r1", "r2", "r3"] {
        on.publish("req", &[r.to_string()])?;
    }
    for s in ["s1", "s2"] {
        on.publish("resp", &[s.to_string()])?;
    }

    // 4. Stop pairing
    handle.detach();
    println!("[done] handlers left on req: {}", on.handler_count("req"));
    Ok(())
}
