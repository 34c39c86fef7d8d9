//! Archive assembly: staged snapshot -> `target/<name>.tar.gz`

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use thiserror::Error;

use super::{pack_model, PackError};
use crate::config::{Model, ProjectPaths};

/// Errors from archive assembly.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Staging failed before archiving started.
    #[error(transparent)]
    Pack(#[from] PackError),

    /// Archive write failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Stage the model and write the compressed archive.
///
/// Member paths are relative to the staging root (`files/...` plus
/// `contract.protobin`), never absolute. The archive is written to a
/// temporary file in the target directory and renamed into place, so the
/// final path either holds a complete, flushed archive or whatever was
/// there before; repeated assembly of the same model name overwrites the
/// previous archive.
pub fn assemble_model(model: &Model, paths: &ProjectPaths) -> Result<PathBuf, ArchiveError> {
    let report = pack_model(model, paths)?;
    let staging_root = paths.staging_dir();
    let archive_path = paths.archive_path(&model.name);
    let tmp_path = paths.target_dir().join(format!(".{}.tar.gz.tmp", model.name));

    let file = File::create(&tmp_path)?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);
    builder.follow_symlinks(false);

    append_dir_recursive(&mut builder, &report.payload_root, &staging_root)?;
    builder.append_path_with_name(
        &report.contract_path,
        relative_member(&report.contract_path, &staging_root)?,
    )?;

    let encoder = builder.into_inner()?;
    let mut file = encoder.finish()?;
    file.flush()?;
    drop(file);

    fs::rename(&tmp_path, &archive_path)?;
    Ok(archive_path)
}

fn relative_member(path: &Path, staging_root: &Path) -> Result<PathBuf, std::io::Error> {
    path.strip_prefix(staging_root)
        .map(Path::to_path_buf)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
}

/// Add a directory and every descendant to the archive.
fn append_dir_recursive<W: Write>(
    builder: &mut tar::Builder<W>,
    dir: &Path,
    staging_root: &Path,
) -> Result<(), std::io::Error> {
    builder.append_dir(relative_member(dir, staging_root)?, dir)?;
    for child in fs::read_dir(dir)? {
        let path = child?.path();
        if path.is_dir() {
            append_dir_recursive(builder, &path, staging_root)?;
        } else {
            builder.append_path_with_name(&path, relative_member(&path, staging_root)?)?;
        }
    }
    Ok(())
}
