//! serving.yaml loader
//!
//! The metadata file declares the model (name, type, contract, payload) and an
//! optional local deployment section:
//!
//! ```yaml
//! model:
//!   name: iris
//!   model_type: scikit-learn
//!   contract: contract.protobin
//!   payload:
//!     - model.pkl
//!     - utils/
//! local_deployment:
//!   name: iris-local
//!   runtime: serving/runtime-python:latest
//!   port: 8080
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the metadata file that marks a project directory.
pub const METADATA_FILE: &str = "serving.yaml";

/// Errors from metadata loading.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The metadata file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The metadata file is not valid YAML for the expected schema.
    #[error("malformed {METADATA_FILE}: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A model declared in serving.yaml.
///
/// Loaded once at startup; immutable for the run's duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    /// Model identifier, also names the archive (`target/<name>.tar.gz`)
    pub name: String,

    /// Framework tag understood by the serving cluster (e.g. "scikit-learn")
    pub model_type: String,

    /// Path to the contract file; the extension selects the encoding
    #[serde(rename = "contract")]
    pub contract_path: PathBuf,

    /// Files and directories to include in the package, in declaration order
    #[serde(default)]
    pub payload: Vec<PathBuf>,
}

/// Local docker deployment settings, 1:1 with a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalDeployment {
    /// Container name
    pub name: String,

    /// Runtime image reference
    pub runtime: String,

    /// Host port mapped onto the runtime's serving port
    pub port: u16,
}

/// Everything serving.yaml declares for one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// The model to package
    pub model: Model,

    /// Optional local-run settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_deployment: Option<LocalDeployment>,
}

impl Metadata {
    /// Load metadata from a project directory.
    ///
    /// Returns `Ok(None)` if the directory has no `serving.yaml`; a present
    /// but malformed file is an error, not absence.
    pub fn from_directory(dir: impl AsRef<Path>) -> Result<Option<Metadata>, MetadataError> {
        let path = dir.as_ref().join(METADATA_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(&path).map_err(|source| MetadataError::Io {
            path: path.clone(),
            source,
        })?;
        let metadata = serde_yaml::from_str(&text)?;
        Ok(Some(metadata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const FULL_YAML: &str = r#"
model:
  name: iris
  model_type: scikit-learn
  contract: contract.prototxt
  payload:
    - model.pkl
    - utils/
local_deployment:
  name: iris-local
  runtime: serving/runtime-python:latest
  port: 8080
"#;

    #[test]
    fn test_missing_metadata_is_none() {
        let dir = TempDir::new().unwrap();
        let loaded = Metadata::from_directory(dir.path()).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_full_metadata_roundtrip() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(METADATA_FILE), FULL_YAML).unwrap();

        let metadata = Metadata::from_directory(dir.path()).unwrap().unwrap();
        assert_eq!(metadata.model.name, "iris");
        assert_eq!(metadata.model.model_type, "scikit-learn");
        assert_eq!(metadata.model.contract_path, PathBuf::from("contract.prototxt"));
        assert_eq!(
            metadata.model.payload,
            vec![PathBuf::from("model.pkl"), PathBuf::from("utils/")]
        );

        let deployment = metadata.local_deployment.expect("local_deployment section");
        assert_eq!(deployment.name, "iris-local");
        assert_eq!(deployment.port, 8080);
    }

    #[test]
    fn test_local_deployment_is_optional() {
        let dir = TempDir::new().unwrap();
        let yaml = "model:\n  name: m\n  model_type: t\n  contract: c.protobin\n";
        std::fs::write(dir.path().join(METADATA_FILE), yaml).unwrap();

        let metadata = Metadata::from_directory(dir.path()).unwrap().unwrap();
        assert!(metadata.local_deployment.is_none());
        assert!(metadata.model.payload.is_empty());
    }

    #[test]
    fn test_malformed_yaml_is_error_not_absence() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(METADATA_FILE), "model: [not, a, mapping]").unwrap();

        let err = Metadata::from_directory(dir.path()).unwrap_err();
        assert!(matches!(err, MetadataError::Yaml(_)));
    }
}
