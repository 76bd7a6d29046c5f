//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sigwatch")]
#[command(author, version, about = "Multi-timeframe RSI signal watcher")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", env = "SIGWATCH_CONFIG")]
    pub config: PathBuf,

    /// Log level (defaults to the config file's logging.level)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, ValueEnum)]
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
    /// Poll prices and notify on signal changes until interrupted
    Run(RunArgs),
    /// Run a single tick and exit
    Once(SymbolArgs),
    /// Show the persisted signal
    Status(SymbolArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Stop after this many ticks
    #[arg(long)]
    pub max_ticks: Option<u64>,

    #[command(flatten)]
    pub target: SymbolArgs,
}

#[derive(clap::Args)]
pub struct SymbolArgs {
    /// Symbol to watch, overriding the config file
    #[arg(short = 'S', long)]
    pub symbol: Option<String>,
}
