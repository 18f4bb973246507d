use std::path::PathBuf;

use clap::Parser;

pub mod root_commands;

pub use root_commands::Commands;

/// Top-level CLI parser for the `ddt` binary.
#[derive(Debug, Parser)]
#[command(
    name = "ddt",
    version,
    about = "Development-driven testing: xUnit test skeletons from C# declarations"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (suppress informational output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Extra TOML config file, layered above `.ddt/config.toml`
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Global flags available before or after subcommands.
#[derive(Clone, Debug)]
pub struct GlobalFlags {
    pub quiet: bool,
    pub verbose: bool,
    pub config: Option<PathBuf>,
}

impl Cli {
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            quiet: self.quiet,
            verbose: self.verbose,
            config: self.config.clone(),
        }
    }
}
