use anyhow::Result;

use crate::commands::CommandReport;
use crate::driver::config::{load_config, resolve_config_path};

#[derive(Debug, Clone)]
pub struct ConfigOptions {
    pub show: bool,
}

pub fn run(opts: &ConfigOptions) -> Result<CommandReport> {
    let mut report = CommandReport::new("config");
    let cfg = load_config()?;

    if opts.show {
        report.detail(
            "resolution.order=defaults -> hkit.toml overrides -> environment overrides -> flags"
                .to_string(),
        );
        match resolve_config_path() {
            Some(path) if path.exists() => {
                report.detail(format!("resolution.hkit_toml={}", path.display()));
            }
            Some(path) => {
                report.detail(format!("resolution.hkit_toml=missing ({})", path.display()));
            }
            None => {
                report.detail("resolution.hkit_toml=unresolved".to_string());
            }
        }

        report.detail(format!("retry.attempts={}", cfg.retry.attempts));
        report.detail(format!("retry.delay_ms={}", cfg.retry.delay_ms));
        report.detail(format!(
            "hdiutil.bin={}",
            cfg.hdiutil
                .bin
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "PATH lookup".to_string())
        ));
        report.detail(format!(
            "hdiutil.transient_exit_codes={:?}",
            cfg.hdiutil.transient_exit_codes
        ));
        report.detail(format!("kernel.option_pattern={}", cfg.kernel.option_pattern));
    }

    Ok(report)
}
