//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// chattail - forward lines appended to a file to a chat channel
#[derive(Parser, Debug)]
#[command(
    name = "chattail",
    author,
    version,
    about = "Tail a growing file and post new content to a chat webhook",
    long_about = "Tails a file from its current end and forwards everything appended to it\n\
                  to a chat incoming webhook. Reads and deliveries run at independent rates:\n\
                  new content is polled every --ingest-interval seconds and at most one\n\
                  message is posted every --flush-interval seconds."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "CHATTAIL_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "CHATTAIL_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Logging setup derived from the global flags
    pub fn observability_config(&self) -> observability::ObservabilityConfig {
        let default_log_level = if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        };

        observability::ObservabilityConfig {
            log_format: self.log_format.into(),
            metrics_port: None,
            default_log_level: default_log_level.to_string(),
            ignore_env: self.quiet,
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Tail a file and forward new content
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),
}

/// Arguments for the `run` command
///
/// Values given here override the configuration file.
#[derive(Parser, Debug, Clone, Default)]
pub struct RunArgs {
    /// File to tail
    #[arg(env = "CHATTAIL_FILE")]
    pub file: Option<PathBuf>,

    /// Incoming webhook URL
    #[arg(long, env = "CHATTAIL_WEBHOOK")]
    pub webhook: Option<String>,

    /// Channel to post into
    #[arg(long, env = "CHATTAIL_CHANNEL")]
    pub channel: Option<String>,

    /// Seconds between file polls
    #[arg(long, env = "CHATTAIL_INGEST_INTERVAL")]
    pub ingest_interval: Option<f64>,

    /// Seconds to wait after each delivery
    #[arg(long, env = "CHATTAIL_FLUSH_INTERVAL")]
    pub flush_interval: Option<f64>,

    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, env = "CHATTAIL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Where messages go
    #[arg(long, value_enum, env = "CHATTAIL_NOTIFIER")]
    pub notifier: Option<NotifierArg>,

    /// Maximum bytes read per poll
    #[arg(long, env = "CHATTAIL_CHUNK_SIZE")]
    pub chunk_size: Option<usize>,

    /// Username shown on posted messages
    #[arg(long, env = "CHATTAIL_USERNAME")]
    pub username: Option<String>,

    /// Serve Prometheus metrics on this port
    #[arg(long, env = "CHATTAIL_METRICS_PORT")]
    pub metrics_port: Option<u16>,

    /// Do not draw the progress spinner
    #[arg(long, env = "CHATTAIL_NO_PROGRESS")]
    pub no_progress: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "chattail.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

/// Notifier selection
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotifierArg {
    /// POST to the chat webhook
    Webhook,
    /// Only log messages (dry run)
    Log,
}

impl From<NotifierArg> for contracts::NotifierKind {
    fn from(arg: NotifierArg) -> Self {
        match arg {
            NotifierArg::Webhook => Self::Webhook,
            NotifierArg::Log => Self::Log,
        }
    }
}
