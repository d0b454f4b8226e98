//! 健康检测结果数据结构
//!
//! 定义健康检测的结果类型和状态枚举

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 健康状态枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    /// 服务正常
    Up,
    /// 服务异常
    Down,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Up => write!(f, "UP"),
            HealthStatus::Down => write!(f, "DOWN"),
        }
    }
}

impl HealthStatus {
    /// 判断状态是否为健康
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Up)
    }

    /// 状态对应的图标
    pub fn emoji(&self) -> &'static str {
        match self {
            HealthStatus::Up => "✅",
            HealthStatus::Down => "❌",
        }
    }
}

/// 响应内容分析结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentAnalysis {
    /// 响应体中是否出现严重关键字
    pub has_critical_keywords: bool,
    /// 响应体中是否出现成功关键字
    pub has_success_keywords: bool,
}

/// 单个目标的检测结果
///
/// 传输失败的结果只带 `error`，收到响应的结果只带 `content_analysis`，
/// 两者不会同时出现。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    /// 目标名称
    pub name: String,
    /// 目标URL
    pub url: String,
    /// 健康状态
    pub status: HealthStatus,
    /// HTTP状态码，传输失败时为空
    pub status_code: Option<u16>,
    /// 响应时间（毫秒，保留两位小数），传输失败时为空
    pub response_time_ms: Option<f64>,
    /// 检测时间戳
    pub timestamp: DateTime<Local>,
    /// 内容分析
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_analysis: Option<ContentAnalysis>,
    /// 传输失败描述
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckResult {
    /// 根据收到的响应创建检测结果
    ///
    /// # 参数
    /// * `name` - 目标名称
    /// * `url` - 目标URL
    /// * `status` - 判定结果
    /// * `status_code` - HTTP状态码
    /// * `response_time` - 响应耗时
    /// * `analysis` - 内容分析
    pub fn from_response(
        name: String,
        url: String,
        status: HealthStatus,
        status_code: u16,
        response_time: Duration,
        analysis: ContentAnalysis,
    ) -> Self {
        Self {
            name,
            url,
            status,
            status_code: Some(status_code),
            response_time_ms: Some(round_millis(response_time)),
            timestamp: Local::now(),
            content_analysis: Some(analysis),
            error: None,
        }
    }

    /// 创建传输失败的检测结果，状态固定为 DOWN
    pub fn transport_failure(name: String, url: String, error: String) -> Self {
        Self {
            name,
            url,
            status: HealthStatus::Down,
            status_code: None,
            response_time_ms: None,
            timestamp: Local::now(),
            content_analysis: None,
            error: Some(error),
        }
    }
}

/// 将耗时转换为毫秒并保留两位小数
pub fn round_millis(duration: Duration) -> f64 {
    (duration.as_secs_f64() * 1000.0 * 100.0).round() / 100.0
}
