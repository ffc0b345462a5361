//! Match-3 host (default binary).
//!
//! With no arguments, serves the JSON protocol on stdin/stdout.
//! `match3 autoplay [--seed N] [--moves N] [--width W] [--height H]` plays a
//! headless session instead and prints a one-line summary.
//!
//! Logs go to stderr, filtered by `MATCH3_LOG` (default `warn`).

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use match3::adapter;
use match3::autoplay::{parse_autoplay_args, run_autoplay};

fn init_tracing() {
    let filter = EnvFilter::try_from_env("MATCH3_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact();
    let _ = subscriber.try_init();
}

fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Some(config) = parse_autoplay_args(&args)? {
        let report = run_autoplay(&config)?;
        println!(
            "seed={} moves={} score={} levels_cleared={} reshuffles={} stuck={}",
            config.seed,
            report.moves,
            report.score,
            report.levels_cleared,
            report.reshuffles,
            report.stuck
        );
        return Ok(());
    }

    adapter::start_from_env()
}
