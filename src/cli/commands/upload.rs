//! Upload command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{Model, ProjectPaths, UploadArgs};
use crate::upload::{registry_url, upload_model};

pub fn run_upload(
    args: UploadArgs,
    model: &Model,
    paths: &ProjectPaths,
    level: LogLevel,
) -> Result<(), String> {
    log(
        level,
        LogLevel::Normal,
        &format!(
            "Uploading {} to {}",
            paths.archive_path(&model.name).display(),
            registry_url(&args.host, args.port)
        ),
    );

    let response = upload_model(&args.host, args.port, model, paths)
        .map_err(|e| format!("Upload failed: {e}"))?;

    log(
        level,
        LogLevel::Normal,
        &format!("Done: HTTP {}", response.status()),
    );
    Ok(())
}
