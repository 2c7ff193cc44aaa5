//! One polling cycle and the cancellable wait between cycles.
//!
//! The loop state is an explicit [`PollSnapshot`] that goes into [`step`]
//! and comes back out. A new snapshot is assembled locally and only returned
//! once complete; a failed cycle hands back the previous one untouched.

use crate::chain::SourceChain;
use crate::config::ScraperConfig;
use crate::consolidate::consolidate;
use crate::entropy::Entropy;
use crate::fetch::Transport;
use crate::models::PollSnapshot;
use crate::outputs::{json, table};
use chrono::Local;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{sleep, Instant};
use tracing::{error, info, instrument, warn};

/// What a cycle produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Real data from these sources.
    Live(Vec<String>),
    /// Only the demonstration table was available.
    Demo,
    /// Nothing at all; the previous snapshot was kept.
    Skipped,
}

/// How the inter-cycle wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Elapsed,
    Cancelled,
}

/// Acquire, consolidate, display and persist once.
#[instrument(level = "info", skip_all)]
pub async fn step<T: Transport, E: Entropy>(
    chain: &mut SourceChain<T, E>,
    config: &ScraperConfig,
    previous: PollSnapshot,
) -> (PollSnapshot, CycleOutcome) {
    let results = chain.acquire().await;
    if results.is_empty() {
        error!(
            kept_teams = previous.teams.len(),
            "No data from any source; keeping previous snapshot"
        );
        if !previous.is_empty() {
            println!("{}", table::render(&previous, config.max_teams));
        }
        return (previous, CycleOutcome::Skipped);
    }

    let snapshot = PollSnapshot {
        teams: consolidate(&results),
        last_update: Some(Local::now()),
        sources_used: results.keys().map(String::from).collect(),
    };

    println!("{}", table::render(&snapshot, config.max_teams));

    if let Err(e) = json::write_snapshot(&snapshot, config, &config.output_path).await {
        error!(path = %config.output_path.display(), error = %e, "Failed to write snapshot file");
    }

    let outcome = if snapshot.is_demo() {
        warn!("Using demonstration data; real sources unavailable");
        CycleOutcome::Demo
    } else {
        info!(
            sources = %snapshot.sources_used.join(", "),
            teams = snapshot.teams.len(),
            "Live data obtained"
        );
        CycleOutcome::Live(snapshot.sources_used.clone())
    };
    (snapshot, outcome)
}

/// Run [`step`] unless shutdown is requested first.
///
/// `current` is only borrowed, so an abandoned cycle leaves it intact.
/// `None` means the cycle was abandoned.
pub async fn run_cycle<T: Transport, E: Entropy>(
    chain: &mut SourceChain<T, E>,
    config: &ScraperConfig,
    current: &PollSnapshot,
    shutdown: &mut watch::Receiver<bool>,
) -> Option<(PollSnapshot, CycleOutcome)> {
    tokio::select! {
        biased;
        _ = cancelled(shutdown) => None,
        done = step(chain, config, current.clone()) => Some(done),
    }
}

/// Resolves once the shutdown flag is set. Never resolves if the sender is gone.
pub async fn cancelled(shutdown: &mut watch::Receiver<bool>) {
    let closed = shutdown.wait_for(|stop| *stop).await.is_err();
    if closed {
        std::future::pending::<()>().await;
    }
}

/// Sleep `total` in slices of at most `step`, returning early on shutdown.
///
/// Logs a countdown every 30 s, and at every slice in the last 30 s.
pub async fn wait_for_next_cycle(
    total: Duration,
    step: Duration,
    shutdown: &mut watch::Receiver<bool>,
) -> WaitOutcome {
    let deadline = Instant::now() + total;
    info!(secs = total.as_secs(), "Next update scheduled");

    loop {
        if *shutdown.borrow() {
            return WaitOutcome::Cancelled;
        }
        let now = Instant::now();
        if now >= deadline {
            return WaitOutcome::Elapsed;
        }
        let slice = (deadline - now).min(step);
        tokio::select! {
            _ = sleep(slice) => {}
            _ = cancelled(shutdown) => return WaitOutcome::Cancelled,
        }

        let remaining = deadline
            .saturating_duration_since(Instant::now())
            .as_secs_f64()
            .round() as u64;
        if remaining > 0 && (remaining <= 30 || remaining % 30 == 0) {
            info!(remaining_secs = remaining, "Waiting for next update");
        }
    }
}
