//! `wifiradar` — Live terminal radar for nearby Wi-Fi access points.
//!
//! Scans with the system wireless adapter, estimates distance to each
//! access point from signal strength, corrects readings against live
//! weather, and renders everything as a table and a sweeping radar
//! dial. Screens are navigable via number keys (1-3): Networks, Radar,
//! and Detail.
//!
//! Logs are written to a file (default `/tmp/wifiradar.log`) to avoid
//! corrupting the terminal UI. A background data bridge task feeds
//! sampling results from `wifiradar-core` into the TUI action loop.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and app launch.

mod action;
mod app;
mod config;
mod data_bridge;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use wifiradar_core::Monitor;

use crate::app::App;

/// Terminal radar for nearby Wi-Fi access points.
#[derive(Parser, Debug)]
#[command(name = "wifiradar", version, about)]
struct Cli {
    /// Wireless interface to scan (defaults to the first one found)
    #[arg(short = 'i', long, env = "WIFIRADAR_INTERFACE")]
    interface: Option<String>,

    /// Location for the weather source (e.g. "Berlin" or "auto:ip")
    #[arg(short = 'l', long, env = "WIFIRADAR_LOCATION")]
    location: Option<String>,

    /// Weather API key
    #[arg(short = 'k', long, env = "WIFIRADAR_WEATHER_API_KEY")]
    api_key: Option<String>,

    /// Log file path (defaults to /tmp/wifiradar.log)
    #[arg(long, default_value = "/tmp/wifiradar.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr — that would
/// corrupt the TUI output. Returns a guard that must be held for the
/// lifetime of the application to ensure logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "wifiradar={log_level},wifiradar_core={log_level},wifiradar_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("wifiradar.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file — hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    // Config file + environment, then CLI flags on top
    let mut cfg = config::load_config()?;
    if cli.interface.is_some() {
        cfg.interface = cli.interface.clone();
    }
    if let Some(location) = &cli.location {
        cfg.location = location.clone();
    }
    if cli.api_key.is_some() {
        cfg.weather_api_key = cli.api_key.clone();
    }

    info!(
        interface = cfg.interface.as_deref().unwrap_or("(auto)"),
        location = %cfg.location,
        "starting wifiradar"
    );

    let monitor = Monitor::new(cfg.to_monitor_config()?)?;
    let mut app = App::new(monitor);
    app.run().await?;

    Ok(())
}
