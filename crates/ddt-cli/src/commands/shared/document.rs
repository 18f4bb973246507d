use anyhow::Context;
use ddt_config::DdtConfig;
use ddt_parser::{Class, DocumentParse, Modifiers, parse_document, parse_symbols_json};
use ddt_xunit::TestClass;

use crate::cli::root_commands::DocumentArgs;

/// Read the source and symbol files and build the class model.
pub fn load_document(args: &DocumentArgs, config: &DdtConfig) -> anyhow::Result<DocumentParse> {
    let source = std::fs::read_to_string(&args.source)
        .with_context(|| format!("failed to read source file '{}'", args.source.display()))?;
    let symbols = std::fs::read_to_string(&args.symbols)
        .with_context(|| format!("failed to read symbols file '{}'", args.symbols.display()))?;
    let symbols = parse_symbols_json(&symbols)
        .with_context(|| format!("invalid symbols file '{}'", args.symbols.display()))?;

    Ok(parse_document(
        &source,
        &symbols,
        &config.parse.method_names_to_ignore,
    ))
}

/// Why a document yields no test class, or `None` when it yields some.
pub fn missing_test_classes_reason(
    classes: &[Class],
    test_classes: &[TestClass<'_>],
) -> Option<&'static str> {
    if classes.is_empty() {
        Some("no C# class found")
    } else if !classes.iter().any(Modifiers::is_testable) {
        Some("no testable class found")
    } else if test_classes.is_empty() {
        Some("no C# class with testable methods found")
    } else {
        None
    }
}
