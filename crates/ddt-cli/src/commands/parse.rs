use ddt_config::DdtConfig;
use ddt_parser::Namespace;
use serde::Serialize;

use crate::cli::root_commands::ParseArgs;
use crate::commands::shared::document::load_document;

#[derive(Debug, Serialize)]
struct FailureEntry {
    symbol: String,
    error: String,
}

#[derive(Debug, Serialize)]
struct ParseResponse {
    namespaces: Vec<Namespace>,
    failures: Vec<FailureEntry>,
}

/// Handle `ddt parse`.
pub fn handle(args: &ParseArgs, config: &DdtConfig) -> anyhow::Result<()> {
    let parse = load_document(&args.document, config)?;

    let response = ParseResponse {
        namespaces: parse.namespaces(),
        failures: parse
            .failures
            .iter()
            .map(|failure| FailureEntry {
                symbol: failure.symbol.clone(),
                error: failure.error.to_string(),
            })
            .collect(),
    };

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
