use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Parse a C# document and print its class model as JSON.
    Parse(ParseArgs),
    /// Print xUnit test classes for a C# document.
    Generate(GenerateArgs),
    /// Write xUnit test classes into a test project of a workspace.
    Write(WriteArgs),
    /// Write xUnit test classes for every document listed in a manifest.
    WriteProject(WriteProjectArgs),
}

/// A C# document and the symbols a language server reported for it.
#[derive(Clone, Debug, Args)]
pub struct DocumentArgs {
    /// C# source file
    #[arg(short, long)]
    pub source: PathBuf,

    /// JSON array of document symbols for the source file
    #[arg(long)]
    pub symbols: PathBuf,
}

#[derive(Clone, Debug, Args)]
pub struct ParseArgs {
    #[command(flatten)]
    pub document: DocumentArgs,
}

#[derive(Clone, Debug, Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub document: DocumentArgs,

    /// Omit usings and namespace declarations
    #[arg(long)]
    pub no_usings: bool,
}

/// The workspace and test project that receive generated files.
#[derive(Clone, Debug, Args)]
pub struct TargetArgs {
    /// Workspace directory searched for `*.csproj` files
    #[arg(short, long)]
    pub workspace: PathBuf,

    /// Test project name (defaults to the first test project found)
    #[arg(short, long)]
    pub test_project: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct WriteArgs {
    #[command(flatten)]
    pub document: DocumentArgs,

    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Clone, Debug, Args)]
pub struct WriteProjectArgs {
    /// JSON array of `{"source", "symbols"}` entries; relative paths resolve
    /// against the manifest's directory
    #[arg(short, long)]
    pub manifest: PathBuf,

    #[command(flatten)]
    pub target: TargetArgs,
}
