use std::fs::OpenOptions;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use surveyor::cli::{Cli, Command};
use surveyor::commands::{self, Context};
use surveyor::config::Config;
use surveyor::{Error, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let data_dir = cli.data_dir.clone().unwrap_or_else(|| config.data_dir());

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.log_level().to_string());
    let filter = EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info"));

    if matches!(cli.command, Command::Fill { .. }) {
        // The terminal form owns the screen; log to a file instead.
        std::fs::create_dir_all(&data_dir).map_err(|e| Error::io(&data_dir, e))?;
        let log_path = data_dir.join("surveyor.log");
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .map_err(|e| Error::io(&log_path, e))?;
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(file)
                    .with_ansi(false),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    // `--user` overrides the configured identity.
    let ctx = Context::new(config, data_dir, cli.user.as_deref())?;
    commands::dispatch(&ctx, cli.command)
}
