use ddt_config::DdtConfig;
use ddt_xunit::test_classes_for;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::GenerateArgs;
use crate::commands::shared::document::{load_document, missing_test_classes_reason};
use crate::commands::shared::output::notice;

/// Handle `ddt generate`.
pub fn handle(args: &GenerateArgs, config: &DdtConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let parse = load_document(&args.document, config)?;
    let source = args.document.source.display();

    let test_classes = test_classes_for(&parse.classes);
    if let Some(reason) = missing_test_classes_reason(&parse.classes, &test_classes) {
        notice(flags, &format!("{source}: {reason}"));
        return Ok(());
    }

    let rendered: Vec<String> = test_classes
        .iter()
        .map(|test_class| test_class.render(&config.generate, !args.no_usings))
        .collect();
    println!("{}", rendered.join("\n\n"));
    Ok(())
}
