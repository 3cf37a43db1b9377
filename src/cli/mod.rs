//! CLI definitions.

pub mod commands;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use trend_core::types::TradingMode;

#[derive(Parser)]
#[command(name = "futures-trend")]
#[command(author, version, about = "Volatility-gated trend following across a futures basket")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level (defaults to logging.level from the config)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one trading cycle
    Run(RunArgs),
    /// Show each instrument's latest signal and the basket gates
    Signals(SignalsArgs),
    /// List configured instruments
    Universe,
    /// Validate configuration
    ValidateConfig {
        /// Print the effective configuration as TOML
        #[arg(long)]
        show: bool,
    },
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Cycle date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Trading mode (paper, live), defaults to session.mode
    #[arg(short, long)]
    pub mode: Option<TradingMode>,

    /// Directory of CSV bar files, defaults to data.directory
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Build orders without sending them
    #[arg(long)]
    pub dry_run: bool,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args)]
pub struct SignalsArgs {
    /// Evaluation date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Directory of CSV bar files, defaults to data.directory
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}
