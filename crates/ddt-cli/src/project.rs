//! C# project discovery.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::Context;
use ignore::WalkBuilder;
use regex::Regex;

static ROOT_NAMESPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<RootNamespace>(.*)</RootNamespace>").expect("root namespace pattern is valid")
});

static ASSEMBLY_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<AssemblyName>(.*)</AssemblyName>").expect("assembly name pattern is valid")
});

/// A `.csproj` file found in the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsProject {
    /// File stem, e.g. `Shop.Tests`.
    pub name: String,
    pub path: PathBuf,
    pub directory: PathBuf,
    /// `RootNamespace`, else `AssemblyName`, else the file stem.
    pub default_namespace: String,
    pub is_test_project: bool,
}

impl CsProject {
    /// Read a project file.
    ///
    /// # Errors
    /// Fails when the file cannot be read.
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read project file '{}'", path.display()))?;
        Ok(Self::from_content(path, &content))
    }

    fn from_content(path: &Path, content: &str) -> Self {
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default();

        let default_namespace = [&*ROOT_NAMESPACE, &*ASSEMBLY_NAME]
            .iter()
            .find_map(|pattern| {
                pattern
                    .captures(content)
                    .map(|captures| captures[1].trim().to_string())
                    .filter(|value| !value.is_empty())
            })
            .unwrap_or_else(|| name.clone());

        Self {
            directory: path.parent().map(Path::to_path_buf).unwrap_or_default(),
            path: path.to_path_buf(),
            is_test_project: content.contains("<IsTestProject>true</IsTestProject>"),
            default_namespace,
            name,
        }
    }
}

/// All `*.csproj` files under `workspace`, sorted by path. Respects
/// `.gitignore`; unreadable projects are skipped with a warning.
///
/// # Errors
/// Fails when `workspace` is not a directory.
pub fn find_projects(workspace: &Path) -> anyhow::Result<Vec<CsProject>> {
    if !workspace.is_dir() {
        anyhow::bail!("workspace '{}' is not a directory", workspace.display());
    }

    let mut paths: Vec<PathBuf> = WalkBuilder::new(workspace)
        .hidden(false)
        .build()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .map(ignore::DirEntry::into_path)
        .filter(|path| path.extension().is_some_and(|ext| ext == "csproj"))
        .collect();
    paths.sort();

    let mut projects = Vec::with_capacity(paths.len());
    for path in paths {
        match CsProject::read(&path) {
            Ok(project) => projects.push(project),
            Err(error) => tracing::warn!(path = %path.display(), "{error:#}"),
        }
    }
    Ok(projects)
}

/// The named test project, or the first test project when no name is given.
#[must_use]
pub fn select_test_project<'a>(
    projects: &'a [CsProject],
    name: Option<&str>,
) -> Option<&'a CsProject> {
    let mut candidates = projects.iter().filter(|p| p.is_test_project);
    match name {
        Some(name) => candidates.find(|p| p.name == name),
        None => candidates.next(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const TEST_PROJECT: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <RootNamespace>Shop.UnitTests</RootNamespace>
    <IsTestProject>true</IsTestProject>
  </PropertyGroup>
</Project>"#;

    #[test]
    fn namespace_prefers_root_namespace_then_assembly_name() {
        let project = CsProject::from_content(Path::new("/w/tests/Shop.Tests.csproj"), TEST_PROJECT);
        assert_eq!(project.name, "Shop.Tests");
        assert_eq!(project.default_namespace, "Shop.UnitTests");
        assert!(project.is_test_project);
        assert_eq!(project.directory, PathBuf::from("/w/tests"));

        let project = CsProject::from_content(
            Path::new("Shop.csproj"),
            "<Project><PropertyGroup><AssemblyName>Shop.Core</AssemblyName></PropertyGroup></Project>",
        );
        assert_eq!(project.default_namespace, "Shop.Core");
        assert!(!project.is_test_project);

        let project = CsProject::from_content(Path::new("Shop.Api.csproj"), "<Project />");
        assert_eq!(project.default_namespace, "Shop.Api");
    }

    #[test]
    fn finds_projects_recursively() {
        let dir = TempDir::new().expect("tempdir should create");
        let src = dir.path().join("src");
        let tests = dir.path().join("tests");
        std::fs::create_dir_all(&src).expect("mkdir should succeed");
        std::fs::create_dir_all(&tests).expect("mkdir should succeed");
        std::fs::write(src.join("Shop.csproj"), "<Project />").expect("write should succeed");
        std::fs::write(tests.join("Shop.Tests.csproj"), TEST_PROJECT).expect("write should succeed");
        std::fs::write(tests.join("notes.txt"), "not a project").expect("write should succeed");

        let projects = find_projects(dir.path()).expect("projects should be found");
        let names: Vec<&str> = projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Shop", "Shop.Tests"]);

        let selected = select_test_project(&projects, None).expect("test project");
        assert_eq!(selected.name, "Shop.Tests");
        assert!(select_test_project(&projects, Some("Shop")).is_none());
    }

    #[test]
    fn missing_workspace_is_an_error() {
        let dir = TempDir::new().expect("tempdir should create");
        assert!(find_projects(&dir.path().join("absent")).is_err());
    }
}
