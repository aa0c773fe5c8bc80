//! tourwatch - concert listing watcher
//!
//! Polls the events API for one band, hides events in denied countries,
//! counts events in the highlighted country, and flags events that were not
//! listed in the previous pass.
//!
//! - `refresh`: one pass (automatic unless `--manual`)
//! - `watch`: startup pass plus timer passes; Enter triggers a manual refresh
//! - `show`: print the persisted log

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tourwatch::models::{RefreshMode, SyncReport};
use tourwatch::output::{render_log_entries, render_report};
use tourwatch::services::{EventLogStore, Synchronizer};
use tourwatch_common::config::{
    default_config_path, RootFolderInitializer, RootFolderResolver, TomlConfig, TourSettings,
};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "tourwatch")]
#[command(about = "Watch a band's concert listing for new events")]
#[command(version)]
struct Args {
    /// Config file (defaults to <config dir>/tourwatch/config.toml)
    #[arg(short, long, env = "TOURWATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Folder holding the event log
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Log level used when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a single synchronization pass
    Refresh {
        /// Manual refresh: clear "new" flags on events already seen
        #[arg(long)]
        manual: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Refresh at startup and on a timer until Ctrl-C
    Watch {
        /// Seconds between automatic refreshes (overrides config)
        #[arg(long)]
        interval: Option<u64>,
    },
    /// Print the persisted event log
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().or_else(default_config_path);
    let toml_config = match &config_path {
        Some(path) => TomlConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => TomlConfig::default(),
    };

    let log_level = args
        .log_level
        .clone()
        .unwrap_or_else(|| toml_config.logging.level.clone());
    tourwatch_common::logging::init_tracing(&log_level);

    info!(
        "Starting tourwatch v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let settings = TourSettings::from_toml(&toml_config).context("Invalid configuration")?;
    let data_folder = RootFolderResolver::new()
        .with_cli_arg(args.root_folder.clone())
        .with_toml(&toml_config)
        .resolve();
    info!("Data folder: {}", data_folder.display());

    match args.command {
        Command::Refresh { manual, json } => {
            let synchronizer = tourwatch::build_synchronizer(&settings, data_folder)?;
            let mode = RefreshMode::from_reset_flag(manual);
            let report = synchronizer
                .run_pass(mode, &CancellationToken::new())
                .await
                .context("Synchronization failed")?;
            print_report(&report, &settings, json)?;
        }
        Command::Watch { interval } => {
            let synchronizer = tourwatch::build_synchronizer(&settings, data_folder)?;
            let period = interval
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(settings.refresh_interval);
            watch(&synchronizer, &settings, period).await;
        }
        Command::Show => {
            let initializer = RootFolderInitializer::new(data_folder);
            let store = EventLogStore::new(initializer.event_log_path(&settings.log_file_name));
            let entries = store.load().context("Failed to read event log")?;
            print!("{}", render_log_entries(&entries));
        }
    }

    Ok(())
}

fn print_report(report: &SyncReport, settings: &TourSettings, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!(
            "{}",
            render_report(report, &settings.artist, &settings.highlighted_country)
        );
    }
    Ok(())
}

/// Timer-driven refresh loop
///
/// The first tick fires immediately (startup refresh). A line on stdin
/// requests a manual refresh. A failed pass leaves the last report on screen.
async fn watch(synchronizer: &Synchronizer, settings: &TourSettings, period: Duration) {
    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Ctrl-C received, shutting down");
            }
            shutdown.cancel();
        });
    }

    info!(interval_secs = period.as_secs(), "Watching for new events (press Enter to refresh)");

    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        let mode = tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => RefreshMode::Automatic,
            line = stdin.next_line(), if stdin_open => match line {
                Ok(Some(_)) => RefreshMode::Manual,
                Ok(None) => {
                    stdin_open = false;
                    continue;
                }
                Err(e) => {
                    warn!("Failed to read stdin, manual refresh disabled: {}", e);
                    stdin_open = false;
                    continue;
                }
            },
        };

        match synchronizer.run_pass(mode, &shutdown).await {
            Ok(report) => print!(
                "{}",
                render_report(&report, &settings.artist, &settings.highlighted_country)
            ),
            Err(e) => warn!("Refresh skipped, keeping previous results: {}", e),
        }
    }
}
