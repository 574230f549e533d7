use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::DriverError;

pub const HDIUTIL_PROGRAM: &str = "hdiutil";

/// The macOS disk image utility, resolved once and invoked per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskUtility {
    bin: PathBuf,
}

impl DiskUtility {
    pub fn new(bin: impl Into<PathBuf>) -> Self {
        Self { bin: bin.into() }
    }

    /// Uses `configured` when given (it must be an existing file), else
    /// looks `hdiutil` up on `PATH`.
    pub fn resolve(configured: Option<&Path>) -> Result<Self, DriverError> {
        if let Some(path) = configured {
            let meta = fs::metadata(path).map_err(|err| DriverError::MissingBinary {
                program: HDIUTIL_PROGRAM.to_string(),
                reason: format!("{}: {err}", path.display()),
            })?;
            if !meta.is_file() {
                return Err(DriverError::MissingBinary {
                    program: HDIUTIL_PROGRAM.to_string(),
                    reason: format!("{} is not a file", path.display()),
                });
            }
            return Ok(Self::new(path));
        }

        let found = which::which(HDIUTIL_PROGRAM).map_err(|err| DriverError::MissingBinary {
            program: HDIUTIL_PROGRAM.to_string(),
            reason: format!("not in PATH ({err})"),
        })?;
        Ok(Self::new(found))
    }

    pub fn bin(&self) -> &Path {
        &self.bin
    }

    /// Runs the utility with `args`. Its stdout and stderr go straight to
    /// ours; nothing is captured.
    pub fn run<I, S>(&self, args: I) -> Result<(), DriverError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<S> = args.into_iter().collect();
        let program = self.bin.display().to_string();
        debug!(
            "executing: {} {}",
            program,
            args.iter()
                .map(|a| a.as_ref().to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let status = Command::new(&self.bin)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| DriverError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(DriverError::CommandFailed { program, status });
        }
        Ok(())
    }
}
