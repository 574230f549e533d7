pub mod config;
pub mod hdiutil;
pub mod kernel_option;

use serde::Serialize;
use std::time::Duration;

use crate::driver::config::DriverConfig;
use crate::driver::multi_error::CombinedError;
use crate::driver::retry::RetryPolicy;

#[derive(Debug, Clone, Serialize)]
pub struct CommandReport {
    pub command: String,
    pub ok: bool,
    pub details: Vec<String>,
    pub issues: Vec<String>,
}

impl CommandReport {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ok: true,
            details: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn detail(&mut self, text: impl Into<String>) {
        self.details.push(text.into());
    }

    pub fn issue(&mut self, text: impl Into<String>) {
        self.ok = false;
        self.issues.push(text.into());
    }

    /// Records a failed retry session, one issue per collected failure.
    pub fn retry_failure(&mut self, what: &str, err: &CombinedError) {
        self.issue(format!("{what} failed after {} attempt(s)", err.count()));
        for line in err.lines() {
            self.issue(line.to_string());
        }
    }
}

/// CLI flags win over the configured `[retry]` section.
pub fn effective_policy(
    cfg: &DriverConfig,
    attempts: Option<u32>,
    delay_ms: Option<u64>,
) -> RetryPolicy {
    let base = cfg.retry_policy();
    RetryPolicy::new(
        attempts.unwrap_or(base.attempts),
        delay_ms.map(Duration::from_millis).unwrap_or(base.delay),
    )
}
