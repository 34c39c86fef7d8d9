//! clap argument definitions for the servir binary

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Servir: model packaging and deployment
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "servir")]
#[command(version)]
#[command(about = "Package model artifacts, archive them, and push to a serving cluster")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Project directory containing serving.yaml
    #[arg(short, long, global = true, default_value = ".")]
    pub dir: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Show the model detected in the project directory
    Status(StatusArgs),

    /// Stage the model payload and contract into target/model/
    Pack,

    /// Build target/<name>.tar.gz from the staged snapshot
    Assemble,

    /// Print the model contract
    Contract,

    /// Upload the assembled archive to a serving cluster
    Upload(UploadArgs),

    /// Run or remove the packaged model as a local container
    #[command(subcommand)]
    Local(LocalCommand),
}

/// Arguments for the status command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct StatusArgs {
    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the upload command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct UploadArgs {
    /// Serving cluster host
    #[arg(long, default_value = "localhost")]
    pub host: String,

    /// Serving cluster HTTP port
    #[arg(long, default_value_t = 8080)]
    pub port: u16,
}

/// Local container lifecycle
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum LocalCommand {
    /// Start a local serving container for the packaged model
    Start,

    /// Stop and remove the local serving container
    Stop,
}

/// Output format for the status command
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {s}. Valid formats: text, json")),
        }
    }
}

/// Parse CLI arguments from a string slice (for testing)
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}
