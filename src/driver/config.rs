use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::driver::kernel_option::{DEFAULT_KERNEL_OPTION_PATTERN, KernelOptionPattern};
use crate::driver::retry::RetryPolicy;

pub const CONFIG_FILE_NAME: &str = "hkit.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub attempts: u32,
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HdiutilConfig {
    pub bin: Option<PathBuf>,
    /// Exit codes treated as "try again". 16 is EBUSY (resource busy).
    pub transient_exit_codes: Vec<i32>,
}

impl Default for HdiutilConfig {
    fn default() -> Self {
        Self {
            bin: None,
            transient_exit_codes: vec![16],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    pub option_pattern: String,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            option_pattern: DEFAULT_KERNEL_OPTION_PATTERN.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DriverConfig {
    pub retry: RetryConfig,
    pub hdiutil: HdiutilConfig,
    pub kernel: KernelConfig,
}

impl DriverConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry.attempts,
            Duration::from_millis(self.retry.delay_ms),
        )
    }

    pub fn kernel_option_pattern(&self) -> Result<KernelOptionPattern> {
        Ok(KernelOptionPattern::new(&self.kernel.option_pattern)?)
    }
}

fn env_or_parse<T: FromStr>(var: &str, fallback: T) -> T {
    match env::var(var) {
        Ok(v) => v.trim().parse::<T>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_or_string(var: &str, fallback: &str) -> String {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => fallback.to_string(),
    }
}

fn env_or_path(var: &str, fallback: Option<PathBuf>) -> Option<PathBuf> {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => Some(PathBuf::from(v.trim())),
        _ => fallback,
    }
}

fn parse_exit_codes(raw: &str) -> Option<Vec<i32>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<i32>().ok())
        .collect()
}

fn env_or_exit_codes(var: &str, fallback: &[i32]) -> Vec<i32> {
    match env::var(var) {
        Ok(v) => parse_exit_codes(&v).unwrap_or_else(|| fallback.to_vec()),
        Err(_) => fallback.to_vec(),
    }
}

fn validate(cfg: &DriverConfig) -> Result<()> {
    if cfg.retry.attempts == 0 {
        return Err(anyhow!("invalid retry attempts: must be >= 1"));
    }
    if cfg.kernel.option_pattern.trim().is_empty() {
        return Err(anyhow!("invalid kernel option pattern: cannot be empty"));
    }
    cfg.kernel_option_pattern()?;
    Ok(())
}

pub fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(custom) = env::var("HKIT_CONFIG_PATH") {
        let trimmed = custom.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    if let Ok(home_override) = env::var("HKIT_HOME") {
        let trimmed = home_override.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed).join(CONFIG_FILE_NAME));
        }
    }

    let base = dirs::config_dir()?;
    Some(base.join("hkit").join(CONFIG_FILE_NAME))
}

fn read_file_config(path: &Path) -> Result<Option<DriverConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(path)
        .map_err(|err| anyhow!("failed to read hkit config {}: {err}", path.display()))?;
    let parsed: DriverConfig = toml::from_str(&raw)
        .map_err(|err| anyhow!("failed to parse hkit config {}: {err}", path.display()))?;
    Ok(Some(parsed))
}

fn apply_env_overrides(cfg: &mut DriverConfig) {
    cfg.retry.attempts = env_or_parse("HKIT_RETRY_ATTEMPTS", cfg.retry.attempts);
    cfg.retry.delay_ms = env_or_parse("HKIT_RETRY_DELAY_MS", cfg.retry.delay_ms);
    cfg.hdiutil.bin = env_or_path("HDIUTIL_BIN", cfg.hdiutil.bin.take());
    cfg.hdiutil.transient_exit_codes = env_or_exit_codes(
        "HKIT_TRANSIENT_EXIT_CODES",
        &cfg.hdiutil.transient_exit_codes,
    );
    cfg.kernel.option_pattern =
        env_or_string("HKIT_KERNEL_OPTION_PATTERN", &cfg.kernel.option_pattern);
}

pub fn load_config() -> Result<DriverConfig> {
    let mut cfg = match resolve_config_path() {
        Some(path) => read_file_config(&path)?.unwrap_or_default(),
        None => DriverConfig::default(),
    };
    apply_env_overrides(&mut cfg);
    validate(&cfg)?;
    Ok(cfg)
}
