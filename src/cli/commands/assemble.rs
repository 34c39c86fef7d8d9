//! Assemble command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{Model, ProjectPaths};
use crate::package::assemble_model;

pub fn run_assemble(model: &Model, paths: &ProjectPaths, level: LogLevel) -> Result<(), String> {
    log(
        level,
        LogLevel::Normal,
        &format!("Assembling {} ...", paths.archive_path(&model.name).display()),
    );

    let archive = assemble_model(model, paths).map_err(|e| format!("Assemble failed: {e}"))?;

    log(level, LogLevel::Normal, &format!("Done: {}", archive.display()));
    Ok(())
}
