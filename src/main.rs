use anyhow::Result;
use clap::Parser;
use soss::config_models::cli_args;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::FmtSubscriber;

pub fn main() -> Result<()> {
    // Fetch the CLI arguments
    let args: cli_args::Args = cli_args::Args::parse();

    // Set up logger.
    // Configure logger to use ISO-8601, of which rfc3339 is a subset.
    // install global collector configured based on RUST_LOG env var.
    // Defaults to `warn` so log lines stay out of the interactive prompts.
    let warn_env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_env_filter(warn_env_filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|_err| eprintln!("Unable to set global default subscriber"))
        .expect("Failed to set trace subscriber");

    soss::initialize(args)
}
