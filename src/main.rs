//! Servir CLI
//!
//! Model packaging and deployment front end.
//!
//! # Usage
//!
//! ```bash
//! # Show the model detected in the current directory
//! servir status
//!
//! # Stage payload + contract into target/model/
//! servir pack
//!
//! # Build target/<name>.tar.gz from the staged snapshot
//! servir assemble
//!
//! # Print the model contract
//! servir contract
//!
//! # Push the archive to a serving cluster
//! servir upload --host serving.example.com --port 8080
//!
//! # Run / remove the packaged model as a local container
//! servir local start
//! servir local stop
//! ```

use clap::Parser;
use servir::cli::{run_command, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
