//! App Vitals - 单次执行的应用健康检测工具
//!
//! 这是一个用Rust编写的应用健康检测工具，支持：
//! - HTTP/HTTPS健康检测与失败重试
//! - 基于状态码和响应内容关键字的 UP/DOWN 判定
//! - 汇总报告生成
//! - 结果持久化为JSON文件
//! - 邮件告警

pub mod cli;
pub mod config;
pub mod error;
pub mod health;
pub mod logging;
pub mod notification;
pub mod sink;

// 重新导出主要类型
pub use config::Config;
pub use error::AppVitalsError;
pub use health::{CheckResult, HealthChecker, HealthStatus, HttpHealthChecker, Report, TargetSpec};

/// 应用程序版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 应用程序名称
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// 应用程序描述
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
