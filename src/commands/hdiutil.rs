use anyhow::Result;

use crate::commands::{CommandReport, effective_policy};
use crate::driver::config::load_config;
use crate::driver::hdiutil::DiskUtility;
use crate::driver::transient::AttemptError;
use crate::error::DriverError;

#[derive(Debug, Clone)]
pub struct HdiutilOptions {
    pub args: Vec<String>,
    pub attempts: Option<u32>,
    pub delay_ms: Option<u64>,
}

fn classify(err: DriverError, transient_exit_codes: &[i32]) -> AttemptError {
    match err.exit_code() {
        Some(code) if transient_exit_codes.contains(&code) => AttemptError::retriable(err),
        _ => AttemptError::permanent(err),
    }
}

pub fn run(opts: &HdiutilOptions) -> Result<CommandReport> {
    let mut report = CommandReport::new("hdiutil");
    let cfg = load_config()?;

    let util = match DiskUtility::resolve(cfg.hdiutil.bin.as_deref()) {
        Ok(util) => util,
        Err(err) => {
            report.issue(format!("{err}; set HDIUTIL_BIN or ensure hdiutil is on PATH"));
            return Ok(report);
        }
    };
    let policy = effective_policy(&cfg, opts.attempts, opts.delay_ms);
    let transient_exit_codes = &cfg.hdiutil.transient_exit_codes;

    report.detail(format!("bin={}", util.bin().display()));
    report.detail(format!("args={}", opts.args.join(" ")));
    report.detail(format!(
        "policy.attempts={} policy.delay_ms={}",
        policy.attempts,
        policy.delay.as_millis()
    ));

    let subcommand = opts.args.first().map(String::as_str).unwrap_or_default();
    match policy.run(|| {
        util.run(&opts.args)
            .map_err(|err| classify(err, transient_exit_codes))
    }) {
        Ok(()) => report.detail(format!("hdiutil {subcommand} succeeded")),
        Err(err) => report.retry_failure(&format!("hdiutil {subcommand}"), &err),
    }

    Ok(report)
}
