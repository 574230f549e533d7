use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("couldn't find kernel option from {} image", .path.display())]
    KernelOptionNotFound { path: PathBuf },
    #[error("invalid kernel option pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("kernel option pattern `{pattern}` must have exactly one capture group, found {groups}")]
    PatternCaptureCount { pattern: String, groups: usize },
    #[error("{program} binary unavailable: {reason}")]
    MissingBinary { program: String, reason: String },
    #[error("exec {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("{program} failed: {status}")]
    CommandFailed { program: String, status: ExitStatus },
}

impl DriverError {
    /// Exit code of a subprocess that ran and failed. `None` for every other
    /// variant, and for a process killed by a signal.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::CommandFailed { status, .. } => status.code(),
            _ => None,
        }
    }

    pub fn is_missing_file(&self) -> bool {
        matches!(self, Self::Open { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

impl crate::driver::transient::Transience for DriverError {}
