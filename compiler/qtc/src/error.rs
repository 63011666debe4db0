//! Driver errors.

use std::io;
use std::path::PathBuf;

use qtc_codegen::CodegenError;

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("{0}")]
    Usage(String),

    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot determine package name for {}: {reason}", .path.display())]
    Package { path: PathBuf, reason: String },

    #[error("error when compiling {}: {source}", .path.display())]
    Compile {
        path: PathBuf,
        #[source]
        source: CodegenError,
    },
}
