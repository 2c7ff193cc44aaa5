//! Command-line interface definitions for the Liga MX table scraper.
//!
//! Every flag is optional; with none the scraper polls the built-in sources
//! every minute and writes `liga_mx_table.json` in the working directory.

use crate::config::ScraperConfig;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Defaults: poll forever, one-minute interval
/// liga_mx_table
///
/// # Custom config file and output location
/// liga_mx_table -c ./scraper.yaml -o /srv/www/liga_mx_table.json
///
/// # One cycle, e.g. from cron
/// liga_mx_table --once
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, env = "LIGA_MX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Snapshot file to write (overrides the config file)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Seconds between polling cycles (overrides the config file)
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Run a single cycle and exit
    #[arg(long)]
    pub once: bool,
}

impl Cli {
    /// Apply flag overrides on top of a loaded config.
    pub fn apply(&self, config: &mut ScraperConfig) {
        if let Some(output) = &self.output {
            config.output_path = output.clone();
        }
        if let Some(interval) = self.interval {
            config.poll_interval_secs = interval;
        }
    }
}
