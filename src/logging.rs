//! 日志系统模块
//!
//! 提供结构化日志配置和初始化功能。日志写到标准错误，
//! 标准输出留给检测进度和汇总报告。

use log::LevelFilter;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter, Layer};

/// 第一次初始化的结果，后续调用直接复用
static LOGGING_INIT: OnceLock<Result<(), String>> = OnceLock::new();

/// 日志配置结构
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// 日志级别
    pub level: LevelFilter,
    /// 是否使用JSON格式
    pub json_format: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::Warn,
            json_format: false,
        }
    }
}

/// 日志系统管理器
pub struct LoggingSystem;

impl LoggingSystem {
    /// 初始化日志系统
    ///
    /// 重复调用是安全的：只有第一次会真正安装订阅器
    pub fn setup_logging(config: LogConfig) -> anyhow::Result<()> {
        LOGGING_INIT
            .get_or_init(|| {
                Self::init_log_tracer()?;
                Self::init_tracing_subscriber(&config)
            })
            .as_ref()
            .map_err(|e| anyhow::anyhow!("{}", e))?;
        Ok(())
    }

    /// 初始化 LogTracer（log crate 到 tracing 的桥接）
    fn init_log_tracer() -> Result<(), String> {
        tracing_log::LogTracer::init().map_err(|e| format!("LogTracer初始化失败: {e}"))
    }

    /// 初始化 tracing subscriber
    fn init_tracing_subscriber(config: &LogConfig) -> Result<(), String> {
        let env_filter = EnvFilter::from_default_env()
            .add_directive(Self::convert_level_to_directive(config.level));

        let fmt_layer = if config.json_format {
            fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_timer(fmt::time::ChronoUtc::rfc_3339())
                .with_file(true)
                .with_line_number(true)
                .boxed()
        } else {
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_timer(fmt::time::ChronoUtc::rfc_3339())
                .with_target(false)
                .boxed()
        };

        registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| format!("tracing subscriber初始化失败: {e}"))?;

        tracing::debug!("日志系统初始化完成: {:?}", config);
        Ok(())
    }

    /// 将 log::LevelFilter 转换为 tracing 的指令
    fn convert_level_to_directive(level: LevelFilter) -> tracing_subscriber::filter::Directive {
        use tracing_subscriber::filter::{Directive, LevelFilter as TracingLevel};
        let filter = match level {
            LevelFilter::Off => TracingLevel::OFF,
            LevelFilter::Error => TracingLevel::ERROR,
            LevelFilter::Warn => TracingLevel::WARN,
            LevelFilter::Info => TracingLevel::INFO,
            LevelFilter::Debug => TracingLevel::DEBUG,
            LevelFilter::Trace => TracingLevel::TRACE,
        };
        Directive::from(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_system_repeated_initialization() {
        let config = LogConfig {
            level: LevelFilter::Info,
            json_format: true,
        };

        assert!(LoggingSystem::setup_logging(config).is_ok());
        // 第二次初始化不会重复安装订阅器
        assert!(LoggingSystem::setup_logging(LogConfig::default()).is_ok());
    }
}
