//! # Liga MX Table
//!
//! Polls the Liga MX standings from several public sites, normalizes the
//! heterogeneous tables into one record format, and republishes the result
//! as a console table and a JSON snapshot file.
//!
//! ## Usage
//!
//! ```sh
//! liga_mx_table                       # poll forever with defaults
//! liga_mx_table -c scraper.yaml       # custom sources / pacing
//! liga_mx_table --once -o table.json  # single cycle
//! ```
//!
//! ## Architecture
//!
//! Each cycle runs sequentially:
//! 1. **Acquisition**: Try sources in priority order; the first with at least
//!    10 rows wins, otherwise fall back to demo data
//! 2. **Consolidation**: One entry per canonical team name
//! 3. **Output**: Print the ranked table and overwrite the snapshot file
//! 4. **Wait**: Sleep until the next cycle in short, interruptible slices

use clap::Parser;
use std::error::Error;
use tokio::sync::watch;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod chain;
mod cli;
mod config;
mod consolidate;
mod entropy;
mod fetch;
mod models;
mod normalize;
mod outputs;
mod poll;
mod scrapers;
mod utils;

use chain::SourceChain;
use cli::Cli;
use config::ScraperConfig;
use entropy::SeededEntropy;
use fetch::{Fetcher, ReqwestTransport};
use models::PollSnapshot;
use normalize::NameNormalizer;
use poll::{CycleOutcome, WaitOutcome};
use utils::ensure_writable_parent;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "liga_mx_table starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let mut config = match &args.config {
        Some(path) => ScraperConfig::load(path).await?,
        None => ScraperConfig::default(),
    };
    args.apply(&mut config);
    config.validate()?;
    info!(
        sources = %config.source_ids().join(" -> "),
        interval = %config.update_interval_label(),
        output = %config.output_path.display(),
        "Configuration ready"
    );

    // Early check; a failure here is reported again on every write.
    if let Err(e) = ensure_writable_parent(&config.output_path).await {
        warn!(
            path = %config.output_path.display(),
            error = %e,
            "Snapshot directory is not writable; snapshots will fail until fixed"
        );
    }

    // --- Shutdown signal ---
    let (stop_tx, mut stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupt received; stopping after the current step");
                let _ = stop_tx.send(true);
            }
            Err(e) => {
                error!(error = %e, "Cannot listen for interrupts; stop the process externally");
                // Keep the sender alive so waits are not treated as closed.
                std::future::pending::<()>().await;
            }
        }
    });

    let transport = ReqwestTransport::new(&config.fetch)?;
    let mut chain = SourceChain::new(
        Fetcher::new(transport, config.fetch.clone()),
        match config.rng_seed {
            Some(seed) => SeededEntropy::seeded(seed),
            None => SeededEntropy::from_os(),
        },
        config.sources.clone(),
        NameNormalizer::new(config.name_aliases.clone()),
        config.chain_limits(),
    );

    let mut snapshot = PollSnapshot::default();
    let mut cycle = 0u64;

    loop {
        if *stop_rx.borrow() {
            break;
        }
        cycle += 1;
        info!(cycle, "Updating standings");

        let Some((next, outcome)) =
            poll::run_cycle(&mut chain, &config, &snapshot, &mut stop_rx).await
        else {
            info!(cycle, "Cycle abandoned on interrupt");
            break;
        };
        snapshot = next;
        match outcome {
            CycleOutcome::Live(sources) => {
                info!(cycle, sources = %sources.join(", "), "Cycle complete")
            }
            CycleOutcome::Demo => warn!(cycle, "Cycle complete with demonstration data"),
            CycleOutcome::Skipped => error!(cycle, "Cycle produced no data"),
        }

        if args.once {
            break;
        }

        let waited =
            poll::wait_for_next_cycle(config.poll_interval(), config.countdown_step(), &mut stop_rx)
                .await;
        if waited == WaitOutcome::Cancelled {
            break;
        }
    }

    info!(
        teams = snapshot.teams.len(),
        last_update = ?snapshot.last_update,
        "liga_mx_table stopped"
    );
    Ok(())
}
