//! Staging pipeline: mirror the payload and contract into `target/model/`
//!
//! Packing is additive: directories are created on demand and files are
//! overwritten, but nothing is removed. A staging area left over from a
//! previous run keeps its stale files; callers that need a clean snapshot
//! must delete `target/model/` themselves.

mod archive;

pub use archive::{assemble_model, ArchiveError};

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::{Model, ProjectPaths};
use crate::contract::{read_contract, ContractError};

/// Errors from staging operations.
#[derive(Debug, Error)]
pub enum PackError {
    /// Filesystem errors propagate untranslated.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The model's contract could not be loaded.
    #[error(transparent)]
    Contract(#[from] ContractError),
}

/// Outcome of a successful [`pack_model`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackReport {
    /// Staged payload root (`target/model/files`)
    pub payload_root: PathBuf,

    /// Staged contract (`target/model/contract.protobin`)
    pub contract_path: PathBuf,

    /// Every payload file written, in copy order
    pub copied: Vec<PathBuf>,
}

/// Where a payload entry lands under `files/`.
///
/// Relative entries mirror their own path. Absolute entries inside the
/// project mirror their path relative to the project root; absolute entries
/// outside it fall back to their final component.
fn mirror_key(entry: &Path, root: &Path) -> PathBuf {
    if !entry.is_absolute() {
        return entry.to_path_buf();
    }
    match entry.strip_prefix(root) {
        Ok(relative) => relative.to_path_buf(),
        Err(_) => PathBuf::from(entry.file_name().unwrap_or_default()),
    }
}

/// Copy one payload entry (file or directory) into the staging area.
///
/// Directories recurse depth-first in directory-listing order, which is
/// OS-dependent. Files copy byte-for-byte via `std::fs::copy`; permissions
/// follow its platform semantics, mtime is not preserved.
///
/// Returns the destination paths written, in copy order.
pub fn pack_path(entry: &Path, paths: &ProjectPaths) -> Result<Vec<PathBuf>, PackError> {
    let source = if entry.is_absolute() {
        entry.to_path_buf()
    } else {
        paths.root().join(entry)
    };
    let key = mirror_key(entry, paths.root());
    let mut copied = Vec::new();
    copy_tree(&source, &key, &paths.files_dir(), &mut copied)?;
    Ok(copied)
}

fn copy_tree(
    source: &Path,
    key: &Path,
    files_dir: &Path,
    copied: &mut Vec<PathBuf>,
) -> Result<(), PackError> {
    if source.is_dir() {
        fs::create_dir_all(files_dir.join(key))?;
        for child in fs::read_dir(source)? {
            let child = child?;
            copy_tree(&child.path(), &key.join(child.file_name()), files_dir, copied)?;
        }
    } else {
        if let Some(parent) = key.parent() {
            fs::create_dir_all(files_dir.join(parent))?;
        }
        let destination = files_dir.join(key);
        fs::copy(source, &destination)?;
        copied.push(destination);
    }
    Ok(())
}

/// Stage every payload entry of the model, in declaration order.
///
/// Returns the payload root and all files written.
pub fn pack_payload(model: &Model, paths: &ProjectPaths) -> Result<(PathBuf, Vec<PathBuf>), PackError> {
    let files_dir = paths.files_dir();
    fs::create_dir_all(&files_dir)?;
    let mut copied = Vec::new();
    for entry in &model.payload {
        copied.extend(pack_path(entry, paths)?);
    }
    Ok((files_dir, copied))
}

/// Stage the model's contract in the canonical binary encoding.
///
/// The contract is loaded from whichever encoding `serving.yaml` points at
/// and always re-serialized as `contract.protobin`, overwriting any previous
/// staged contract. Nothing is written if loading fails.
pub fn pack_contract(model: &Model, paths: &ProjectPaths) -> Result<PathBuf, PackError> {
    let source = if model.contract_path.is_absolute() {
        model.contract_path.clone()
    } else {
        paths.root().join(&model.contract_path)
    };
    let contract = read_contract(&source)?;

    let destination = paths.contract_path();
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&destination, contract.to_binary())?;
    Ok(destination)
}

/// Stage payload and contract, payload first.
///
/// The order carries no data dependency; it is fixed so user-facing output
/// is deterministic.
pub fn pack_model(model: &Model, paths: &ProjectPaths) -> Result<PackReport, PackError> {
    let (payload_root, copied) = pack_payload(model, paths)?;
    let contract_path = pack_contract(model, paths)?;
    Ok(PackReport {
        payload_root,
        contract_path,
        copied,
    })
}
