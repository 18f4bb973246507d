use std::path::{Path, PathBuf};

use anyhow::Context;
use ddt_config::{DdtConfig, GenerateSettings};
use ddt_xunit::{TestClass, test_classes_for};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{DocumentArgs, TargetArgs, WriteArgs, WriteProjectArgs};
use crate::commands::shared::document::{load_document, missing_test_classes_reason};
use crate::commands::shared::output::notice;
use crate::project::{CsProject, find_projects, select_test_project};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum WriteAction {
    Created,
    Appended,
}

#[derive(Debug, Serialize)]
struct WrittenFile {
    path: PathBuf,
    class_name: String,
    action: WriteAction,
}

/// A manifest document that could not be written.
#[derive(Debug, Serialize)]
struct FileFailure {
    source: PathBuf,
    error: String,
}

#[derive(Debug, Serialize)]
struct WriteReport {
    project: String,
    namespace: String,
    files: Vec<WrittenFile>,
    usings_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    failures: Vec<FileFailure>,
}

impl WriteReport {
    fn new(project: &CsProject, settings: &GenerateSettings, files: Vec<WrittenFile>) -> Self {
        Self {
            project: project.name.clone(),
            namespace: settings.target_project_namespace.clone().unwrap_or_default(),
            files,
            usings_file: None,
            failures: Vec::new(),
        }
    }
}

/// The selected test project and the settings to write into it with.
#[derive(Debug)]
struct Target {
    project: CsProject,
    settings: GenerateSettings,
}

/// One `write-project` manifest entry.
#[derive(Debug, Deserialize)]
struct ManifestEntry {
    source: PathBuf,
    symbols: PathBuf,
}

/// Handle `ddt write`.
pub fn handle(args: &WriteArgs, config: &DdtConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let Some(target) = resolve_target(&args.target, config, flags)? else {
        return Ok(());
    };

    let files = write_document(&args.document, config, &target, flags)?;
    if files.is_empty() {
        return Ok(());
    }

    let mut report = WriteReport::new(&target.project, &target.settings, files);
    report.usings_file = ensure_usings_file(&target.project.directory, &target.settings)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Handle `ddt write-project`.
pub fn handle_project(
    args: &WriteProjectArgs,
    config: &DdtConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let documents = read_manifest(&args.manifest)?;
    let Some(target) = resolve_target(&args.target, config, flags)? else {
        return Ok(());
    };

    let report = write_documents(&documents, config, &target, flags)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Find the test project and fill in its namespace when the config names none.
fn resolve_target(
    args: &TargetArgs,
    config: &DdtConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<Option<Target>> {
    let projects = find_projects(&args.workspace)?;
    let Some(project) = select_test_project(&projects, args.test_project.as_deref()) else {
        notice(
            flags,
            &format!("{}: no test project found", args.workspace.display()),
        );
        return Ok(None);
    };
    debug!(project = %project.name, path = %project.path.display(), "selected test project");

    let mut settings = config.generate.clone();
    if settings.target_project_namespace.as_deref().is_none_or(str::is_empty) {
        settings.target_project_namespace = Some(project.default_namespace.clone());
    }

    Ok(Some(Target {
        project: project.clone(),
        settings,
    }))
}

/// Manifest entries as document paths, relative ones resolved against the
/// manifest's directory.
fn read_manifest(path: &Path) -> anyhow::Result<Vec<DocumentArgs>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest '{}'", path.display()))?;
    let entries: Vec<ManifestEntry> = serde_json::from_str(&content)
        .with_context(|| format!("invalid manifest '{}'", path.display()))?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    Ok(entries
        .into_iter()
        .map(|entry| DocumentArgs {
            source: base.join(entry.source),
            symbols: base.join(entry.symbols),
        })
        .collect())
}

/// Write the test classes of one document. Empty when the document has none.
fn write_document(
    document: &DocumentArgs,
    config: &DdtConfig,
    target: &Target,
    flags: &GlobalFlags,
) -> anyhow::Result<Vec<WrittenFile>> {
    let parse = load_document(document, config)?;
    let test_classes = test_classes_for(&parse.classes);
    if let Some(reason) = missing_test_classes_reason(&parse.classes, &test_classes) {
        notice(flags, &format!("{}: {reason}", document.source.display()));
        return Ok(Vec::new());
    }
    write_test_classes(&target.project.directory, &test_classes, &target.settings)
}

/// Write every document, logging and collecting per-document failures.
fn write_documents(
    documents: &[DocumentArgs],
    config: &DdtConfig,
    target: &Target,
    flags: &GlobalFlags,
) -> anyhow::Result<WriteReport> {
    let mut files = Vec::new();
    let mut failures = Vec::new();

    for document in documents {
        match write_document(document, config, target, flags) {
            Ok(written) => files.extend(written),
            Err(error) => {
                warn!(source = %document.source.display(), "{error:#}");
                failures.push(FileFailure {
                    source: document.source.clone(),
                    error: format!("{error:#}"),
                });
            }
        }
    }

    let mut report = WriteReport::new(&target.project, &target.settings, files);
    if !report.files.is_empty() {
        report.usings_file = ensure_usings_file(&target.project.directory, &target.settings)?;
    }
    report.failures = failures;
    Ok(report)
}

/// Write each test class to `<directory>/<ClassName>Tests.cs`. An existing
/// file gets the class appended under the configured prefix, without usings
/// or namespace.
fn write_test_classes(
    directory: &Path,
    test_classes: &[TestClass<'_>],
    settings: &GenerateSettings,
) -> anyhow::Result<Vec<WrittenFile>> {
    let mut written = Vec::with_capacity(test_classes.len());

    for test_class in test_classes {
        let path = directory.join(test_class.file_name());
        let entry = if path.exists() {
            let prefixed = test_class
                .clone()
                .with_prefix(&settings.test_class_name_prefix_if_file_exists);
            let mut content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read test file '{}'", path.display()))?;
            content.push_str("\n\n");
            content.push_str(&prefixed.render(settings, false));
            std::fs::write(&path, content)
                .with_context(|| format!("failed to append to test file '{}'", path.display()))?;
            WrittenFile {
                class_name: prefixed.class_name().to_string(),
                action: WriteAction::Appended,
                path,
            }
        } else {
            std::fs::write(&path, test_class.render(settings, true))
                .with_context(|| format!("failed to write test file '{}'", path.display()))?;
            WrittenFile {
                class_name: test_class.class_name().to_string(),
                action: WriteAction::Created,
                path,
            }
        };

        info!(path = %entry.path.display(), action = ?entry.action, "wrote test class");
        written.push(entry);
    }

    Ok(written)
}

/// Create the global usings file when the project has none. Returns the
/// path only when it was created.
fn ensure_usings_file(
    directory: &Path,
    settings: &GenerateSettings,
) -> anyhow::Result<Option<PathBuf>> {
    let path = directory.join(&settings.usings_file_name);
    if path.exists() {
        return Ok(None);
    }
    std::fs::write(&path, &settings.usings_file_content)
        .with_context(|| format!("failed to write usings file '{}'", path.display()))?;
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddt_parser::{Class, Method};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const CART_SOURCE: &str = include_str!("../../tests/fixtures/cart.cs");
    const CART_SYMBOLS: &str = include_str!("../../tests/fixtures/cart.symbols.json");

    fn class() -> Class {
        let method = Method::from_parts("public int Add", Some("int a, int b"))
            .expect("method should parse");
        Class {
            namespace: Some("Shop".to_string()),
            methods: vec![method],
            ..Class::from_definition("public class Calculator").expect("class should parse")
        }
    }

    fn settings() -> GenerateSettings {
        GenerateSettings {
            target_project_namespace: Some("Shop.Tests".to_string()),
            ..GenerateSettings::default()
        }
    }

    #[test]
    fn creates_new_test_file_with_namespace() {
        let dir = TempDir::new().expect("tempdir should create");
        let classes = vec![class()];
        let test_classes = test_classes_for(&classes);

        let written = write_test_classes(dir.path(), &test_classes, &settings())
            .expect("write should succeed");

        assert_eq!(written.len(), 1);
        assert_eq!(written[0].action, WriteAction::Created);
        assert_eq!(written[0].class_name, "CalculatorTests");
        let content = std::fs::read_to_string(dir.path().join("CalculatorTests.cs"))
            .expect("file should exist");
        assert!(content.starts_with("using Shop;\n\nnamespace Shop.Tests;\n\n"));
        assert!(content.contains("public class CalculatorTests\n{"));
    }

    #[test]
    fn appends_prefixed_class_to_existing_file() {
        let dir = TempDir::new().expect("tempdir should create");
        let path = dir.path().join("CalculatorTests.cs");
        std::fs::write(&path, "// existing").expect("write should succeed");
        let classes = vec![class()];
        let test_classes = test_classes_for(&classes);

        let written = write_test_classes(dir.path(), &test_classes, &settings())
            .expect("write should succeed");

        assert_eq!(written[0].action, WriteAction::Appended);
        assert_eq!(written[0].class_name, "DdtCalculatorTests");
        let content = std::fs::read_to_string(&path).expect("file should exist");
        assert!(content.starts_with("// existing\n\npublic class DdtCalculatorTests\n{"));
        assert!(!content.contains("namespace"));
    }

    #[test]
    fn usings_file_is_created_once() {
        let dir = TempDir::new().expect("tempdir should create");
        let settings = settings();

        let created = ensure_usings_file(dir.path(), &settings).expect("usings should write");
        assert_eq!(created, Some(dir.path().join("Usings.cs")));
        let content =
            std::fs::read_to_string(dir.path().join("Usings.cs")).expect("file should exist");
        assert_eq!(content, "global using Xunit;\n");

        let again = ensure_usings_file(dir.path(), &settings).expect("usings should check");
        assert_eq!(again, None);
    }

    // ── Reports and batches ──

    fn flags() -> GlobalFlags {
        GlobalFlags {
            quiet: true,
            verbose: false,
            config: None,
        }
    }

    fn project(directory: &Path) -> CsProject {
        CsProject {
            name: "Shop.Tests".to_string(),
            path: directory.join("Shop.Tests.csproj"),
            directory: directory.to_path_buf(),
            default_namespace: "Shop.Tests".to_string(),
            is_test_project: true,
        }
    }

    #[test]
    fn report_names_the_namespace_files_are_written_under() {
        let dir = TempDir::new().expect("tempdir should create");
        let settings = GenerateSettings {
            target_project_namespace: Some("Shop.Specs".to_string()),
            ..GenerateSettings::default()
        };

        let report = WriteReport::new(&project(dir.path()), &settings, Vec::new());

        assert_eq!(report.project, "Shop.Tests");
        assert_eq!(report.namespace, "Shop.Specs");
    }

    #[test]
    fn configured_namespace_wins_over_project_namespace() {
        let dir = TempDir::new().expect("tempdir should create");
        std::fs::write(
            dir.path().join("Shop.Tests.csproj"),
            "<Project><PropertyGroup><IsTestProject>true</IsTestProject></PropertyGroup></Project>",
        )
        .expect("write should succeed");
        let mut config = DdtConfig::default();
        config.generate.target_project_namespace = Some("Shop.Specs".to_string());
        let args = TargetArgs {
            workspace: dir.path().to_path_buf(),
            test_project: None,
        };

        let target = resolve_target(&args, &config, &flags())
            .expect("workspace should scan")
            .expect("test project should be found");
        assert_eq!(target.project.default_namespace, "Shop.Tests");
        assert_eq!(target.settings.target_project_namespace.as_deref(), Some("Shop.Specs"));

        config.generate.target_project_namespace = None;
        let target = resolve_target(&args, &config, &flags())
            .expect("workspace should scan")
            .expect("test project should be found");
        assert_eq!(target.settings.target_project_namespace.as_deref(), Some("Shop.Tests"));
    }

    #[test]
    fn manifest_paths_resolve_against_manifest_directory() {
        let dir = TempDir::new().expect("tempdir should create");
        let manifest = dir.path().join("documents.json");
        std::fs::write(
            &manifest,
            r#"[{"source": "src/Cart.cs", "symbols": "/abs/Cart.json"}]"#,
        )
        .expect("write should succeed");

        let documents = read_manifest(&manifest).expect("manifest should read");

        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].source, dir.path().join("src/Cart.cs"));
        assert_eq!(documents[0].symbols, PathBuf::from("/abs/Cart.json"));
    }

    #[test]
    fn failing_document_does_not_stop_the_batch() {
        let sources = TempDir::new().expect("tempdir should create");
        let tests = TempDir::new().expect("tempdir should create");
        std::fs::write(sources.path().join("Cart.cs"), CART_SOURCE).expect("write should succeed");
        std::fs::write(sources.path().join("Cart.json"), CART_SYMBOLS)
            .expect("write should succeed");
        std::fs::write(sources.path().join("Order.cs"), "public class Order { }")
            .expect("write should succeed");
        let documents = vec![
            DocumentArgs {
                source: sources.path().join("Order.cs"),
                symbols: sources.path().join("Order.json"),
            },
            DocumentArgs {
                source: sources.path().join("Cart.cs"),
                symbols: sources.path().join("Cart.json"),
            },
        ];
        let target = Target {
            project: project(tests.path()),
            settings: settings(),
        };

        let report = write_documents(&documents, &DdtConfig::default(), &target, &flags())
            .expect("batch should finish");

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].source, sources.path().join("Order.cs"));
        assert!(report.failures[0].error.contains("Order.json"));
        assert_eq!(report.files.len(), 1);
        assert_eq!(report.files[0].class_name, "CartTests");
        assert!(tests.path().join("CartTests.cs").exists());
        assert_eq!(report.usings_file, Some(tests.path().join("Usings.cs")));
        assert_eq!(report.namespace, "Shop.Tests");
    }
}
