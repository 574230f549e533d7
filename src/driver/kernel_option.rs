use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use regex::bytes::Regex;

use crate::error::DriverError;

/// Matches the `append` line of an isolinux config and captures the boot
/// options that follow it.
pub const DEFAULT_KERNEL_OPTION_PATTERN: &str = r"(?:\t|\s{2})append\s+([[:print:]]+)";

/// A compiled pattern with exactly one capture group.
#[derive(Debug, Clone)]
pub struct KernelOptionPattern {
    regex: Regex,
}

impl KernelOptionPattern {
    pub fn new(pattern: &str) -> Result<Self, DriverError> {
        let regex = Regex::new(pattern).map_err(|source| DriverError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        let groups = regex.captures_len() - 1;
        if groups != 1 {
            return Err(DriverError::PatternCaptureCount {
                pattern: pattern.to_string(),
                groups,
            });
        }
        Ok(Self { regex })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    fn capture<'a>(&self, line: &'a [u8]) -> Option<&'a [u8]> {
        let caps = self.regex.captures(line)?;
        Some(caps.get(1).map_or(&[][..], |m| m.as_bytes()))
    }
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Returns the capture from the first line of `path` matching `pattern`.
pub fn read_line(path: &Path, pattern: &KernelOptionPattern) -> Result<String, DriverError> {
    let file = File::open(path).map_err(|source| DriverError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    let mut line = Vec::new();

    loop {
        line.clear();
        let read = reader
            .read_until(b'\n', &mut line)
            .map_err(|source| DriverError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        if read == 0 {
            break;
        }
        if let Some(captured) = pattern.capture(trim_line_ending(&line)) {
            return Ok(String::from_utf8_lossy(captured).into_owned());
        }
    }

    Err(DriverError::KernelOptionNotFound {
        path: path.to_path_buf(),
    })
}
