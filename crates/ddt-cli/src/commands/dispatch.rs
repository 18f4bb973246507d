use ddt_config::DdtConfig;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub fn dispatch(command: &Commands, config: &DdtConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Parse(args) => commands::parse::handle(args, config),
        Commands::Generate(args) => commands::generate::handle(args, config, flags),
        Commands::Write(args) => commands::write::handle(args, config, flags),
        Commands::WriteProject(args) => commands::write::handle_project(args, config, flags),
    }
}
