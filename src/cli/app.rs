use super::commands::{AuthArgs, ExportArgs, ImportArgs, ListArgs};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pingone-forms")]
#[command(about = "Export and import PingOne forms between environments")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file (defaults to the user config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List configured environments
    Envs,
    /// List the forms of an environment
    List(ListArgs),
    /// Export forms to local JSON files
    Export(ExportArgs),
    /// Import local JSON files as new forms
    Import(ImportArgs),
    /// Check that a token can be obtained for an environment
    Auth(AuthArgs),
    /// Write an example configuration file
    Init,
}
