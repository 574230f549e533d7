use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::commands;

#[derive(Debug, Parser)]
#[command(name = "hkit")]
#[command(about = "Retry-aware helpers for the hyperkit VM driver")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract the kernel boot options from an isolinux config.
    KernelOption(KernelOptionArgs),
    /// Run hdiutil, retrying exit codes configured as transient.
    Hdiutil(HdiutilArgs),
    /// Print the effective configuration.
    Config(ConfigArgs),
}

#[derive(Debug, Args, Default)]
pub struct RetryArgs {
    /// Maximum number of attempts; defaults to `retry.attempts`.
    #[arg(long)]
    pub attempts: Option<u32>,
    /// Fixed delay between attempts; defaults to `retry.delay_ms`.
    #[arg(long)]
    pub delay_ms: Option<u64>,
}

#[derive(Debug, Args)]
pub struct KernelOptionArgs {
    pub path: PathBuf,
    /// Regex with exactly one capture group; defaults to `kernel.option_pattern`.
    #[arg(long)]
    pub pattern: Option<String>,
    #[command(flatten)]
    pub retry: RetryArgs,
}

#[derive(Debug, Args)]
pub struct HdiutilArgs {
    #[command(flatten)]
    pub retry: RetryArgs,
    #[arg(last = true, required = true)]
    pub args: Vec<String>,
}

#[derive(Debug, Args, Default)]
pub struct ConfigArgs {
    #[arg(long)]
    pub show: bool,
}

fn print_report(report: &commands::CommandReport, as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("command: {}", report.command);
    println!("ok: {}", report.ok);
    if !report.details.is_empty() {
        println!("details:");
        for detail in &report.details {
            println!("- {detail}");
        }
    }
    if !report.issues.is_empty() {
        println!("issues:");
        for issue in &report.issues {
            println!("- {issue}");
        }
    }
    Ok(())
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    crate::logging::init_logging(cli.verbose);

    let report = match &cli.command {
        Command::KernelOption(args) => {
            commands::kernel_option::run(&commands::kernel_option::KernelOptionOptions {
                path: args.path.clone(),
                pattern: args.pattern.clone(),
                attempts: args.retry.attempts,
                delay_ms: args.retry.delay_ms,
            })?
        }
        Command::Hdiutil(args) => commands::hdiutil::run(&commands::hdiutil::HdiutilOptions {
            args: args.args.clone(),
            attempts: args.retry.attempts,
            delay_ms: args.retry.delay_ms,
        })?,
        Command::Config(args) => {
            commands::config::run(&commands::config::ConfigOptions { show: args.show })?
        }
    };

    print_report(&report, cli.json)?;

    if report.ok {
        Ok(())
    } else {
        std::process::exit(2);
    }
}
