//! Staging and archive path scheme for a project directory
//!
//! All packaging output lives under `target/` inside the project:
//!
//! ```text
//! target/
//! ├── model/                  staging root (archive paths are relative to this)
//! │   ├── files/              mirrored payload
//! │   └── contract.protobin   canonical contract encoding
//! └── <name>.tar.gz           assembled archive
//! ```
//!
//! The staging area is created lazily and never cleaned automatically;
//! re-packing overwrites or augments whatever is already there.

use std::path::{Path, PathBuf};

/// Directory under the project root holding all packaging output.
pub const TARGET_DIR: &str = "target";

/// Staging root directory name under [`TARGET_DIR`].
pub const MODEL_DIR: &str = "model";

/// Payload mirror directory name under the staging root.
pub const FILES_DIR: &str = "files";

/// Filename of the staged contract, always the binary encoding.
pub const CONTRACT_FILE: &str = "contract.protobin";

/// Resolved packaging paths for one project directory.
///
/// Built once from an explicit project root and passed into every
/// operation that touches the staging area or the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    root: PathBuf,
}

impl ProjectPaths {
    /// Path scheme rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The project root itself.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/target`
    pub fn target_dir(&self) -> PathBuf {
        self.root.join(TARGET_DIR)
    }

    /// `<root>/target/model` — the staging root.
    pub fn staging_dir(&self) -> PathBuf {
        self.target_dir().join(MODEL_DIR)
    }

    /// `<root>/target/model/files` — the payload mirror.
    pub fn files_dir(&self) -> PathBuf {
        self.staging_dir().join(FILES_DIR)
    }

    /// `<root>/target/model/contract.protobin` — the staged contract.
    pub fn contract_path(&self) -> PathBuf {
        self.staging_dir().join(CONTRACT_FILE)
    }

    /// `<root>/target/<name>.tar.gz` — the assembled archive.
    pub fn archive_path(&self, model_name: &str) -> PathBuf {
        self.target_dir().join(format!("{model_name}.tar.gz"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_scheme() {
        let paths = ProjectPaths::new("/proj");
        assert_eq!(paths.staging_dir(), Path::new("/proj/target/model"));
        assert_eq!(paths.files_dir(), Path::new("/proj/target/model/files"));
        assert_eq!(
            paths.contract_path(),
            Path::new("/proj/target/model/contract.protobin")
        );
        assert_eq!(paths.archive_path("iris"), Path::new("/proj/target/iris.tar.gz"));
    }
}
