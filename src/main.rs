//! App Vitals 主程序入口
//!
//! 单次执行的应用健康检测工具

use anyhow::{Context, Result};
use app_vitals::cli::{Args, CheckCommand, EXIT_FATAL};
use app_vitals::logging::{LogConfig, LoggingSystem};
use clap::Parser;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // 解析命令行参数
    let args = Args::parse();

    // 初始化日志系统
    let log_config = LogConfig {
        level: args.log_level.clone().into(),
        json_format: args.log_json,
    };

    LoggingSystem::setup_logging(log_config).context("初始化日志系统失败")?;

    info!("App Vitals v{} 启动", app_vitals::VERSION);

    // 执行检测
    let code = match CheckCommand.execute(&args).await {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            error!("检测无法开始: {}", e);
            eprintln!("❌ {e}");
            EXIT_FATAL
        }
    };

    std::process::exit(code);
}
