//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `wayguard` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting

use anyhow::{Context, Result};
use clap::Parser;
use std::process;
use tokio_util::sync::CancellationToken;

use wayguard::app::cancel_on_ctrl_c;
use wayguard::config::{Cli, Command};
use wayguard::initialization::init_logger_with;
use wayguard::{run_dashboard, run_relay, run_track, TrackReport};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists), falling back
    // to one next to the executable
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let cli = Cli::parse();

    init_logger_with(cli.log_level.into(), cli.log_format)
        .context("Failed to initialize logger")?;

    let shutdown = CancellationToken::new();
    let _ctrl_c = cancel_on_ctrl_c(shutdown.clone());

    let result = match cli.command {
        Command::Dashboard(args) => run_dashboard(args.into(), shutdown).await,
        Command::Relay(args) => run_relay(args.into(), shutdown).await,
        Command::Track(args) => run_track(args.into(), shutdown)
            .await
            .map(|report| print_track_report(&report)),
    };

    if let Err(e) = result {
        eprintln!("wayguard error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}

fn print_track_report(report: &TrackReport) {
    for event in &report.events {
        println!(
            "📍 line {}: reached '{}' (region #{})",
            event.line, event.reached.name, event.reached.index
        );
    }
    println!(
        "✅ Processed {} sample{} ({} skipped): {}/{} region{} visited in {:.1}s",
        report.samples,
        if report.samples == 1 { "" } else { "s" },
        report.skipped,
        report.visited_count(),
        report.regions.len(),
        if report.regions.len() == 1 { "" } else { "s" },
        report.elapsed_seconds
    );
}
