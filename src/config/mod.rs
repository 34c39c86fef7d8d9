//! Project configuration: CLI arguments, serving metadata, and path scheme
//!
//! A project directory is anything containing a `serving.yaml`. The metadata
//! in that file is loaded once at startup and passed explicitly into every
//! operation; there is no ambient context object.

mod cli;
mod metadata;
mod paths;

pub use cli::{parse_args, Cli, Command, LocalCommand, OutputFormat, StatusArgs, UploadArgs};
pub use metadata::{LocalDeployment, Metadata, MetadataError, Model};
pub use paths::ProjectPaths;
