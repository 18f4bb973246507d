use anyhow::Context;
use clap::Parser;

mod cli;
mod commands;
mod project;

fn main() {
    if let Err(error) = run() {
        eprintln!("ddt error: {error:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();
    let config = match flags.config.as_deref() {
        Some(path) => ddt_config::DdtConfig::load_from_with_dotenv(path)
            .with_context(|| format!("failed to load config file '{}'", path.display()))?,
        None => ddt_config::DdtConfig::load_with_dotenv().context("failed to load ddt config")?,
    };

    commands::dispatch::dispatch(&cli.command, &config, &flags)
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("DDT_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
