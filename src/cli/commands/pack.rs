//! Pack command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{Model, ProjectPaths};
use crate::package::pack_model;

pub fn run_pack(model: &Model, paths: &ProjectPaths, level: LogLevel) -> Result<(), String> {
    log(level, LogLevel::Normal, "Packing model snapshot...");

    let report = pack_model(model, paths).map_err(|e| format!("Pack failed: {e}"))?;

    for copied in &report.copied {
        log(level, LogLevel::Normal, &format!("Copy: {}", copied.display()));
    }
    log(
        level,
        LogLevel::Normal,
        &format!(
            "Done. Packed: {} and {}",
            report.payload_root.display(),
            report.contract_path.display()
        ),
    );
    Ok(())
}
