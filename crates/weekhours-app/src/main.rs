//! Weekhours - edit a weekly opening-hours schedule as shared patterns.
//!
//! Every invocation loads the editor state, runs one subcommand, and saves
//! the state back if the subcommand changed it.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use weekhours_app::config::logs_dir;
use weekhours_app::{load_state, run, save_state, AppConfig, Command};
use weekhours_core::ScheduleEditor;

/// Weekhours - weekly opening-hours editor
#[derive(Parser, Debug)]
#[command(name = "weekhours", version, about)]
struct Args {
    /// Config file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Schedule state file (overrides the config)
    #[arg(long)]
    state: Option<PathBuf>,

    /// Enable debug logging to the console
    #[arg(long)]
    debug: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

/// Initialize logging with file rotation.
fn init_logging(
    args: &Args,
    config: &AppConfig,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_level = if args.debug {
        "debug"
    } else {
        args.log_level.as_deref().unwrap_or(&config.log_level)
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "weekhours={0},weekhours_core={0},weekhours_app={0},warn",
            log_level
        ))
    });

    if let Some(log_dir) = logs_dir() {
        if std::fs::create_dir_all(&log_dir).is_ok() {
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .max_log_files(5)
                .filename_prefix("weekhours")
                .filename_suffix("log")
                .build(&log_dir)
                .ok();

            if let Some(appender) = file_appender {
                let (non_blocking, guard) = tracing_appender::non_blocking(appender);

                // Console output stays clean unless debugging.
                if args.debug {
                    tracing_subscriber::registry()
                        .with(env_filter)
                        .with(fmt::layer().with_writer(std::io::stderr))
                        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
                        .init();
                } else {
                    tracing_subscriber::registry()
                        .with(env_filter)
                        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
                        .init();
                }

                tracing::debug!("Logging to {:?}", log_dir);
                return Some(guard);
            }
        }
    }

    // Fallback: console logging only
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::warn!("File logging unavailable, using console only");
    None
}

fn load_config(args: &Args) -> anyhow::Result<AppConfig> {
    let config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::load_default()?,
    };
    Ok(match &args.state {
        Some(path) => config.with_state_file(path),
        None => config,
    })
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    // Keep guard alive for the duration of the program
    let _log_guard = init_logging(&args, &config);

    tracing::debug!("Config: {:?}", config);
    tracing::info!("Running {:?} on {:?}", args.command, config.state_file);

    let state = load_state(&config.state_file)?;
    let mut editor = ScheduleEditor::new(state).context("failed to open schedule")?;

    let report = run(&args.command, &mut editor, &config)?;
    print!("{}", report.output);

    if report.changed {
        save_state(&config.state_file, &editor.into_state())?;
        tracing::info!("Schedule saved");
    }
    Ok(())
}
