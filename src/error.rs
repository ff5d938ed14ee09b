// Sun Oct 18 2026 - Alex

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("Invalid input path: {0}")]
    Discovery(PathBuf),
    #[error("Failed to read input directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Export listing failed: {0}")]
    Listing(String),
    #[error("Source generation failed: {0}")]
    Generation(String),
    #[error("Build failed: {message}")]
    Build { message: String, output: String },
    #[error("Toolchain not found: {0}")]
    Toolchain(String),
    #[error("{program} did not finish within {}s", .timeout.as_secs())]
    Timeout { program: String, timeout: Duration },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Output {path} {reason}")]
    OutputConflict { path: PathBuf, reason: String },
}

impl ProxyError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ProxyError::Io {
            path: path.into(),
            source,
        }
    }

    /// Errors that stop the whole run instead of a single library.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ProxyError::Discovery(_)
                | ProxyError::DirectoryRead { .. }
                | ProxyError::OutputDir { .. }
                | ProxyError::Config(_)
        )
    }

    /// Toolchain diagnostics attached to a failed build, if any.
    pub fn tool_output(&self) -> Option<&str> {
        match self {
            ProxyError::Build { output, .. } if !output.trim().is_empty() => Some(output.as_str()),
            _ => None,
        }
    }
}

pub type ProxyResult<T> = Result<T, ProxyError>;
