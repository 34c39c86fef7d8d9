//! Status command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{Metadata, OutputFormat, StatusArgs};

pub fn run_status(
    args: StatusArgs,
    metadata: Option<&Metadata>,
    level: LogLevel,
) -> Result<(), String> {
    let Some(metadata) = metadata else {
        log(level, LogLevel::Normal, "Directory doesn't have a serving metadata");
        return Ok(());
    };

    match args.format {
        OutputFormat::Text => {
            log(
                level,
                LogLevel::Normal,
                &format!("Detected a model: {}", metadata.model.name),
            );
            log(
                level,
                LogLevel::Normal,
                &format!("Model type: {}", metadata.model.model_type),
            );
            log(level, LogLevel::Normal, "Files to upload:");
            for entry in &metadata.model.payload {
                log(level, LogLevel::Normal, &format!("  {}", entry.display()));
            }
            if let Some(deployment) = &metadata.local_deployment {
                log(
                    level,
                    LogLevel::Verbose,
                    &format!(
                        "Local deployment: {} ({}) on port {}",
                        deployment.name, deployment.runtime, deployment.port
                    ),
                );
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(metadata)
                .map_err(|e| format!("JSON serialization error: {e}"))?;
            println!("{json}");
        }
    }

    Ok(())
}
