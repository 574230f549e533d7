use anyhow::Result;
use std::path::PathBuf;

use crate::commands::{CommandReport, effective_policy};
use crate::driver::config::load_config;
use crate::driver::kernel_option::{KernelOptionPattern, read_line};
use crate::driver::transient::AttemptError;
use crate::error::DriverError;

#[derive(Debug, Clone)]
pub struct KernelOptionOptions {
    pub path: PathBuf,
    pub pattern: Option<String>,
    pub attempts: Option<u32>,
    pub delay_ms: Option<u64>,
}

/// An image that is not on disk yet may still be extracting; anything else
/// will not change by waiting.
fn classify(err: DriverError) -> AttemptError {
    if err.is_missing_file() {
        AttemptError::retriable(err)
    } else {
        AttemptError::permanent(err)
    }
}

pub fn run(opts: &KernelOptionOptions) -> Result<CommandReport> {
    let mut report = CommandReport::new("kernel-option");
    let cfg = load_config()?;
    let pattern = match &opts.pattern {
        Some(raw) => KernelOptionPattern::new(raw)?,
        None => cfg.kernel_option_pattern()?,
    };
    let policy = effective_policy(&cfg, opts.attempts, opts.delay_ms);

    report.detail(format!("path={}", opts.path.display()));
    report.detail(format!("pattern={}", pattern.as_str()));

    match policy.run(|| read_line(&opts.path, &pattern).map_err(classify)) {
        Ok(option) => report.detail(format!("kernel_option={option}")),
        Err(err) => report.retry_failure("kernel option lookup", &err),
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::classify;
    use crate::driver::transient::Transience;
    use crate::error::DriverError;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn only_missing_image_is_transient() {
        let missing = DriverError::Open {
            path: PathBuf::from("/iso/isolinux.cfg"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert!(classify(missing).is_transient());

        let no_match = DriverError::KernelOptionNotFound {
            path: PathBuf::from("/iso/isolinux.cfg"),
        };
        assert!(!classify(no_match).is_transient());
    }
}
