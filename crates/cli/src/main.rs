//! # chattail CLI
//!
//! 命令行接口入口点。
//!
//! 提供：
//! - 配置加载与验证（配置文件 + 命令行/环境变量覆盖）
//! - watcher / dispatcher 编排与生命周期管理
//! - Ctrl+C / SIGTERM 关闭处理

mod cli;
mod commands;
mod error;
mod pipeline;
mod progress;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_tail, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    observability::init_with_config(cli.observability_config())?;

    info!(version = env!("CARGO_PKG_VERSION"), "chattail starting");

    let result = match &cli.command {
        Commands::Run(args) => run_tail(args).await,
        Commands::Validate(args) => run_validate(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}
