//! CLI command implementations

mod assemble;
mod contract;
mod local;
mod pack;
mod status;
mod upload;

use crate::cli::LogLevel;
use crate::config::{Cli, Command, Metadata, ProjectPaths};

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> Result<(), String> {
    // Configure output based on verbose/quiet flags
    let log_level = if cli.quiet {
        LogLevel::Quiet
    } else if cli.verbose {
        LogLevel::Verbose
    } else {
        LogLevel::Normal
    };

    let metadata =
        Metadata::from_directory(&cli.dir).map_err(|e| format!("Metadata error: {e}"))?;
    let paths = ProjectPaths::new(&cli.dir);

    match cli.command {
        Command::Status(args) => status::run_status(args, metadata.as_ref(), log_level),
        Command::Pack => pack::run_pack(&ensure_metadata(metadata)?.model, &paths, log_level),
        Command::Assemble => {
            assemble::run_assemble(&ensure_metadata(metadata)?.model, &paths, log_level)
        }
        Command::Contract => {
            contract::run_contract(&ensure_metadata(metadata)?.model, &paths, log_level)
        }
        Command::Upload(args) => {
            upload::run_upload(args, &ensure_metadata(metadata)?.model, &paths, log_level)
        }
        Command::Local(command) => {
            local::run_local(command, &ensure_metadata(metadata)?, &paths, log_level)
        }
    }
}

/// Every command except status requires serving metadata.
fn ensure_metadata(metadata: Option<Metadata>) -> Result<Metadata, String> {
    metadata.ok_or_else(|| "Directory doesn't have a serving metadata".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_args;
    use tempfile::TempDir;

    #[test]
    fn test_pack_without_metadata_fails() {
        let dir = TempDir::new().unwrap();
        let cli = parse_args([
            "servir",
            "pack",
            "--dir",
            dir.path().to_str().unwrap(),
            "--quiet",
        ])
        .unwrap();

        let err = run_command(cli).unwrap_err();
        assert!(err.contains("serving metadata"));
    }

    #[test]
    fn test_status_without_metadata_succeeds() {
        let dir = TempDir::new().unwrap();
        let cli = parse_args([
            "servir",
            "status",
            "--dir",
            dir.path().to_str().unwrap(),
            "--quiet",
        ])
        .unwrap();

        assert!(run_command(cli).is_ok());
    }
}
