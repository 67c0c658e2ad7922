//! Error types for the build step
//!
//! Every failure is terminal for the run. Messages name the environment
//! variable, file or command involved so a CI log is enough to fix it.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Exit code used when publishing the results location fails
pub const EXIT_EXPORT_FAILED: i32 = 1;

/// Exit code used for every other failure
pub const EXIT_FAILURE: i32 = 2;

/// Main error type for the build step
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    #[error("{0} is not defined!")]
    ConfigurationMissing(String),

    #[error("Invalid {name}: {reason}")]
    ConfigurationInvalid { name: String, reason: String },

    #[error("Artifact {name} not found at '{path}'")]
    ArtifactNotFound { name: String, path: PathBuf },

    // === IO Errors ===
    #[error("Failed to write '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // === Subprocess Errors ===
    #[error("Program '{program}' not found on PATH")]
    ProgramNotFound { program: String },

    #[error("Empty command line")]
    EmptyCommand,

    #[error("Failed to launch '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("Command '{command}' failed with {status}{}", captured_suffix(.output))]
    SubprocessFailed {
        command: String,
        status: ExitStatus,
        output: Option<String>,
    },

    // === Export Errors ===
    #[error("Failed to export {key}, error: {reason} | output: {output}")]
    ExportFailed {
        key: String,
        reason: String,
        output: String,
    },
}

fn captured_suffix(output: &Option<String>) -> String {
    match output {
        Some(out) if !out.trim().is_empty() => format!(" | output: {}", out.trim_end()),
        _ => String::new(),
    }
}

impl Error {
    /// Create a configuration invalid error
    pub fn invalid(name: &str, reason: impl ToString) -> Self {
        Self::ConfigurationInvalid {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ExportFailed { .. } => EXIT_EXPORT_FAILED,
            _ => EXIT_FAILURE,
        }
    }
}
