//! Contract command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{Model, ProjectPaths};
use crate::contract::read_contract;

pub fn run_contract(model: &Model, paths: &ProjectPaths, level: LogLevel) -> Result<(), String> {
    log(level, LogLevel::Normal, "Reading contract...");

    let path = if model.contract_path.is_absolute() {
        model.contract_path.clone()
    } else {
        paths.root().join(&model.contract_path)
    };
    let contract = read_contract(&path).map_err(|e| format!("Contract error: {e}"))?;

    print!("{contract}");
    Ok(())
}
