//! Archive upload to a serving registry
//!
//! One multipart POST to `/api/v1/model`; text fields `model_name` and
//! `model_type`, file field `payload` carrying the archive. No retry and no
//! request timeout: a transient failure or a hung registry is surfaced to
//! the caller as-is.

use std::path::Path;

use reqwest::blocking::multipart::Form;
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use thiserror::Error;

use crate::config::{Model, ProjectPaths};
use crate::package::{assemble_model, ArchiveError};

/// Errors from model upload.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Assembly failed before any network activity.
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// The archive could not be attached to the request.
    #[error("failed to read archive for upload: {0}")]
    Io(#[from] std::io::Error),

    /// Transport-level failure (connection refused, reset, ...).
    #[error("upload request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The registry answered with a non-2xx status.
    #[error("registry rejected the upload: HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// Registry endpoint for model submission.
pub fn registry_url(host: &str, port: u16) -> String {
    format!("http://{host}:{port}/api/v1/model")
}

/// Assemble the model and POST the archive to the registry.
///
/// Returns the registry's response on any 2xx status; non-2xx becomes
/// [`UploadError::Status`].
pub fn upload_model(
    host: &str,
    port: u16,
    model: &Model,
    paths: &ProjectPaths,
) -> Result<Response, UploadError> {
    let archive = assemble_model(model, paths)?;
    upload_archive(host, port, model, &archive)
}

/// POST an already-assembled archive to the registry.
pub fn upload_archive(
    host: &str,
    port: u16,
    model: &Model,
    archive: &Path,
) -> Result<Response, UploadError> {
    let url = registry_url(host, port);
    let form = Form::new()
        .text("model_name", model.name.clone())
        .text("model_type", model.model_type.clone())
        .file("payload", archive)?;

    let response = Client::new().post(&url).multipart(form).send()?;

    if response.status().is_success() {
        Ok(response)
    } else {
        let status = response.status();
        let body = response.text().unwrap_or_default();
        Err(UploadError::Status { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_url() {
        assert_eq!(
            registry_url("localhost", 8080),
            "http://localhost:8080/api/v1/model"
        );
        assert_eq!(
            registry_url("serving.internal", 80),
            "http://serving.internal:80/api/v1/model"
        );
    }

    #[test]
    fn test_missing_archive_is_io_error() {
        let model = Model {
            name: "iris".to_string(),
            model_type: "scikit-learn".to_string(),
            contract_path: "contract.protobin".into(),
            payload: vec![],
        };
        let err = upload_archive("localhost", 1, &model, Path::new("no/such.tar.gz")).unwrap_err();
        assert!(matches!(err, UploadError::Io(_)));
    }
}
