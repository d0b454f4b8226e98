//! 健康检测模块
//!
//! 提供检测目标定义、HTTP检测与重试、响应判定和汇总报告功能

pub mod checker;
pub mod classifier;
pub mod report;
pub mod result;
pub mod target;
pub mod transport;

// 重新导出主要类型
pub use checker::{HealthChecker, HttpHealthChecker};
pub use classifier::Classifier;
pub use report::{FailureEntry, Report, ResponseTimeStats};
pub use result::{CheckResult, ContentAnalysis, HealthStatus};
pub use target::{default_targets, TargetSpec};
pub use transport::{HttpResponse, ReqwestTransport, Transport};
