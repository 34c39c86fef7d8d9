//! servir: package, inspect, and ship models to a serving cluster
//!
//! The crate stages a model's declared payload and contract into a
//! `target/model/` snapshot, assembles the snapshot into a `tar.gz`
//! archive, and uploads the archive to a serving registry over HTTP.
//! A thin docker wrapper runs the packaged model locally.
//!
//! Everything is synchronous and blocking; each step runs to completion
//! before the next begins.
//!
//! # Example
//!
//! ```no_run
//! use servir::config::{Metadata, ProjectPaths};
//! use servir::package::pack_model;
//!
//! let metadata = Metadata::from_directory(".").unwrap().expect("serving.yaml");
//! let paths = ProjectPaths::new(".");
//! let report = pack_model(&metadata.model, &paths).unwrap();
//! println!("staged {} file(s)", report.copied.len());
//! ```

pub mod cli;
pub mod config;
pub mod contract;
pub mod local;
pub mod package;
pub mod upload;

pub use config::{LocalDeployment, Metadata, Model, ProjectPaths};
pub use contract::{read_contract, ContractError, ModelContract};
pub use package::{assemble_model, pack_model, ArchiveError, PackError, PackReport};
pub use upload::{upload_model, UploadError};
