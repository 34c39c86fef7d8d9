//! Local deployment: run the packaged model in a docker container
//!
//! Thin wrapper over the `docker` binary. The container mounts the staging
//! directory read-only at `/model` and maps the deployment's host port onto
//! the runtime's fixed serving port. Containers are keyed by the deployment
//! name from `serving.yaml`.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

use crate::config::{LocalDeployment, Metadata, ProjectPaths};

/// Port every runtime image serves on inside the container.
pub const RUNTIME_PORT: u16 = 9090;

/// Mount point of the packaged model inside the container.
pub const MODEL_MOUNT: &str = "/model";

/// Errors from local container management.
#[derive(Debug, Error)]
pub enum LocalError {
    /// serving.yaml has no local_deployment section.
    #[error("serving.yaml has no local_deployment section")]
    NoDeployment,

    /// The staging area does not exist yet.
    #[error("'{name}' is not packed. Execute `pack` first.")]
    NotPacked { name: String },

    /// A container with the deployment name is already present.
    #[error("'{name}' container is already started.")]
    AlreadyRunning { name: String },

    /// No container with the deployment name exists.
    #[error("'{name}' container is not found.")]
    NotFound { name: String },

    /// The docker binary could not be executed at all.
    #[error("failed to invoke {binary}: {source}")]
    Spawn {
        binary: PathBuf,
        source: std::io::Error,
    },

    /// docker ran but reported failure.
    #[error("docker {command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    /// Filesystem errors while resolving the mount path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Handle on the docker CLI.
///
/// The binary path is injectable so precondition logic can be tested
/// without a docker daemon.
#[derive(Debug, Clone)]
pub struct DockerCli {
    binary: PathBuf,
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new()
    }
}

impl DockerCli {
    /// Use `docker` from PATH.
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from("docker"),
        }
    }

    /// Use an explicit binary (tests).
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn capture(&self, args: &[String]) -> Result<String, LocalError> {
        let output = Command::new(&self.binary)
            .args(args)
            .output()
            .map_err(|source| LocalError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(LocalError::CommandFailed {
                command: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Whether a container with this exact name exists (running or not).
    pub fn container_exists(&self, name: &str) -> Result<bool, LocalError> {
        let stdout = self.capture(&[
            "ps".to_string(),
            "-a".to_string(),
            "--format".to_string(),
            "{{.Names}}".to_string(),
            "--filter".to_string(),
            format!("name=^{name}$"),
        ])?;
        Ok(stdout.lines().any(|line| line.trim() == name))
    }

    /// Start a detached container serving the mounted package.
    pub fn start(&self, deployment: &LocalDeployment, package_dir: &Path) -> Result<(), LocalError> {
        self.capture(&[
            "run".to_string(),
            "--rm".to_string(),
            "--detach".to_string(),
            "--name".to_string(),
            deployment.name.clone(),
            "--publish".to_string(),
            format!("{}:{RUNTIME_PORT}", deployment.port),
            "--volume".to_string(),
            format!("{}:{MODEL_MOUNT}:ro", package_dir.display()),
            deployment.runtime.clone(),
        ])?;
        Ok(())
    }

    /// Force-remove a container by name.
    pub fn remove(&self, name: &str) -> Result<(), LocalError> {
        self.capture(&["rm".to_string(), "-f".to_string(), name.to_string()])?;
        Ok(())
    }
}

/// Start the local serving container for a packaged model.
///
/// Preconditions, checked in order: a local_deployment section exists, the
/// model has been packed, and no container with the deployment name is
/// already present. Returns the container name on success.
pub fn start_local(
    docker: &DockerCli,
    metadata: &Metadata,
    paths: &ProjectPaths,
) -> Result<String, LocalError> {
    let deployment = metadata
        .local_deployment
        .as_ref()
        .ok_or(LocalError::NoDeployment)?;

    if !paths.staging_dir().exists() {
        return Err(LocalError::NotPacked {
            name: metadata.model.name.clone(),
        });
    }
    if docker.container_exists(&deployment.name)? {
        return Err(LocalError::AlreadyRunning {
            name: deployment.name.clone(),
        });
    }

    // docker needs an absolute host path for the bind mount
    let mount = std::fs::canonicalize(paths.staging_dir())?;
    docker.start(deployment, &mount)?;
    Ok(deployment.name.clone())
}

/// Remove the local serving container.
///
/// Fails with [`LocalError::NotFound`] if no container with the deployment
/// name exists; nothing is touched in that case.
pub fn stop_local(docker: &DockerCli, metadata: &Metadata) -> Result<String, LocalError> {
    let deployment = metadata
        .local_deployment
        .as_ref()
        .ok_or(LocalError::NoDeployment)?;

    if !docker.container_exists(&deployment.name)? {
        return Err(LocalError::NotFound {
            name: deployment.name.clone(),
        });
    }
    docker.remove(&deployment.name)?;
    Ok(deployment.name.clone())
}
