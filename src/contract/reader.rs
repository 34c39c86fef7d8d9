//! Extension-driven contract loading

use std::path::Path;

use super::{text, ContractError, ModelContract};

/// Contract encoding, selected by file extension.
///
/// Detection is a pure function of the path; unknown extensions map to
/// [`ContractFormat::Unsupported`] rather than failing at detection time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractFormat {
    /// `.protobin` — canonical protobuf wire format
    Binary,
    /// `.prototxt` — human-readable text format
    Text,
    /// Anything else
    Unsupported,
}

impl ContractFormat {
    /// Classify a contract path by its extension.
    pub fn from_path(path: &Path) -> ContractFormat {
        match path.extension().and_then(|e| e.to_str()) {
            Some("protobin") => ContractFormat::Binary,
            Some("prototxt") => ContractFormat::Text,
            _ => ContractFormat::Unsupported,
        }
    }
}

/// Load a contract from either encoding.
///
/// Pure read: no side effects on the filesystem.
pub fn read_contract(path: impl AsRef<Path>) -> Result<ModelContract, ContractError> {
    let path = path.as_ref();
    match ContractFormat::from_path(path) {
        ContractFormat::Binary => {
            let bytes = std::fs::read(path).map_err(|source| ContractError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            ModelContract::from_binary(&bytes)
        }
        ContractFormat::Text => {
            let content = std::fs::read_to_string(path).map_err(|source| ContractError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            text::parse(&content)
        }
        ContractFormat::Unsupported => Err(ContractError::UnsupportedFormat {
            extension: path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_string(),
        }),
    }
}
