//! 命令行参数定义
//!
//! 使用clap定义应用程序的命令行接口

use crate::config::get_default_config_path;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// App Vitals - 单次执行的应用健康检测工具
#[derive(Parser, Debug, Clone)]
#[command(
    name = "app-vitals",
    version = crate::VERSION,
    about = crate::APP_DESCRIPTION,
    long_about = None
)]
pub struct Args {
    /// 配置文件路径
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "配置文件路径（JSON或TOML）",
        env = "APP_VITALS_CONFIG"
    )]
    pub config: Option<PathBuf>,

    /// 单个检测URL
    #[arg(
        short,
        long,
        value_name = "URL",
        help = "检测单个URL",
        conflicts_with = "file"
    )]
    pub url: Option<String>,

    /// 检测目标列表文件
    #[arg(short, long, value_name = "FILE", help = "检测目标列表文件（JSON或TOML）")]
    pub file: Option<PathBuf>,

    /// 保存结果，可选指定文件名
    #[arg(
        short,
        long,
        value_name = "FILE",
        num_args = 0..=1,
        help = "保存检测结果为JSON文件，未指定文件名时自动生成"
    )]
    pub save: Option<Option<PathBuf>>,

    /// 存在DOWN结果时发送告警邮件
    #[arg(long, help = "存在DOWN结果时发送告警邮件")]
    pub email: bool,

    /// 覆盖请求超时（秒）
    #[arg(long, value_name = "SECONDS", help = "请求超时（秒）")]
    pub timeout: Option<f64>,

    /// 覆盖最大尝试次数
    #[arg(
        long,
        value_name = "COUNT",
        value_parser = clap::value_parser!(u32).range(1..),
        help = "每个目标的最大尝试次数"
    )]
    pub retry_attempts: Option<u32>,

    /// 覆盖最大并发检测数
    #[arg(
        long,
        value_name = "COUNT",
        value_parser = clap::value_parser!(u64).range(1..),
        help = "最大并发检测数"
    )]
    pub max_concurrent: Option<u64>,

    /// 校验TLS证书
    #[arg(long, help = "校验TLS证书（默认不校验）")]
    pub verify_tls: bool,

    /// 日志级别
    #[arg(
        short,
        long,
        value_enum,
        default_value = "warn",
        help = "日志级别",
        env = "APP_VITALS_LOG_LEVEL"
    )]
    pub log_level: LogLevel,

    /// 日志使用JSON格式
    #[arg(long, help = "日志使用JSON格式输出")]
    pub log_json: bool,

    /// 输出格式
    #[arg(long, value_enum, default_value = "text", help = "报告输出格式")]
    pub format: OutputFormat,
}

/// 日志级别枚举
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum LogLevel {
    /// 调试级别
    Debug,
    /// 信息级别
    Info,
    /// 警告级别
    Warn,
    /// 错误级别
    Error,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// 输出格式枚举
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum OutputFormat {
    /// 文本格式（进度与汇总报告）
    Text,
    /// JSON格式（结果与汇总，不打印进度）
    Json,
}

impl Args {
    /// 获取配置文件路径
    ///
    /// 未通过参数或环境变量指定时，回退到默认位置
    pub fn get_config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(get_default_config_path)
    }

    /// 结果保存请求
    ///
    /// # 返回
    /// * `None` - 未要求保存
    /// * `Some(None)` - 保存到自动生成的文件名
    /// * `Some(Some(path))` - 保存到指定路径
    pub fn save_destination(&self) -> Option<Option<PathBuf>> {
        self.save.clone()
    }
}
