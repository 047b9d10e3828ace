//! risk-runner: daily risk-indicator monitoring batch.
//!
//! Usage:
//!   risk-runner flags --dir data [--prefix IND --from 1 --to 151]
//!   risk-runner breaches --raw panel.csv --out reports [--date 2025-10-06]
//!   risk-runner breaches --quotes quotes.csv --out reports
//!   risk-runner alert --dir reports [--date 2025-10-06] [--to CHAT] [--out alerts.log]
//!   risk-runner propagate --dir reports [--start 500 --max 700] [--out row_flags.csv]
//!   risk-runner derive --dir data --out derived.csv [--benchmark KOSPI=IND001] [--directory dir.csv]

mod alerts;
mod args;
mod breaches;
mod derive;
mod flags;
mod provider;

use anyhow::Context;
use monitor_core::MonitorConfig;

fn usage() -> ! {
    eprintln!("Usage:");
    eprintln!("  risk-runner flags --dir DIR [--prefix IND] [--from N] [--to N]");
    eprintln!("  risk-runner breaches (--raw FILE | --quotes FILE) --out DIR [--date YYYY-MM-DD]");
    eprintln!("  risk-runner alert --dir DIR [--date YYYY-MM-DD] [--to DEST] [--out FILE]");
    eprintln!("  risk-runner propagate --dir DIR [--date YYYY-MM-DD] [--start N] [--max N] [--prefix IND] [--out FILE]");
    eprintln!("  risk-runner derive --dir DIR --out FILE [--benchmark NAME=ID]... [--directory FILE]");
    std::process::exit(1);
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "risk_runner=info,breach_registry=info".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let config = MonitorConfig::from_env().context("loading monitor configuration")?;

    match args.get(1).map(|s| s.as_str()) {
        Some("flags") => flags::run(&args, &config),
        Some("breaches") => breaches::run(&args, &config),
        Some("alert") => alerts::run_alert(&args, &config),
        Some("propagate") => alerts::run_propagate(&args),
        Some("derive") => derive::run(&args, &config),
        _ => usage(),
    }
}
