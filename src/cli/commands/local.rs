//! Local start/stop command implementations

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{LocalCommand, Metadata, ProjectPaths};
use crate::local::{start_local, stop_local, DockerCli};

pub fn run_local(
    command: LocalCommand,
    metadata: &Metadata,
    paths: &ProjectPaths,
    level: LogLevel,
) -> Result<(), String> {
    let docker = DockerCli::new();

    match command {
        LocalCommand::Start => {
            let name = start_local(&docker, metadata, paths).map_err(|e| e.to_string())?;
            log(
                level,
                LogLevel::Normal,
                &format!("'{name}' container is started."),
            );
        }
        LocalCommand::Stop => {
            let name = stop_local(&docker, metadata).map_err(|e| e.to_string())?;
            log(
                level,
                LogLevel::Normal,
                &format!("'{name}' container is removed."),
            );
        }
    }
    Ok(())
}
