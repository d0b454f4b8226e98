//! 汇总报告
//!
//! 对一组检测结果计算统计信息并渲染为文本

use crate::health::result::{CheckResult, HealthStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 缺少错误信息时使用的占位文本
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// UP 结果的响应时间统计（毫秒）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResponseTimeStats {
    /// 平均响应时间
    pub avg_ms: f64,
    /// 最小响应时间
    pub min_ms: f64,
    /// 最大响应时间
    pub max_ms: f64,
}

/// DOWN 结果条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureEntry {
    /// 目标名称
    pub name: String,
    /// 错误信息或占位文本
    pub error: String,
}

/// 汇总报告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// 目标总数
    pub total: usize,
    /// UP 数量
    pub up: usize,
    /// DOWN 数量
    pub down: usize,
    /// 成功率（百分比），没有结果时为空
    pub success_rate: Option<f64>,
    /// UP 结果的响应时间统计，没有可用数据时为空
    pub response_times: Option<ResponseTimeStats>,
    /// DOWN 结果列表，保持提交顺序
    pub failures: Vec<FailureEntry>,
    /// 是否全部 UP
    pub all_up: bool,
}

impl Report {
    /// 对检测结果进行汇总
    ///
    /// 纯计算，对同一组结果重复调用得到相同的报告
    pub fn summarize(results: &[CheckResult]) -> Self {
        let total = results.len();
        let up = results
            .iter()
            .filter(|r| r.status == HealthStatus::Up)
            .count();
        let down = total - up;

        let success_rate = if total > 0 {
            Some(up as f64 / total as f64 * 100.0)
        } else {
            None
        };

        let up_times: Vec<f64> = results
            .iter()
            .filter(|r| r.status == HealthStatus::Up)
            .filter_map(|r| r.response_time_ms)
            .collect();

        let failures = results
            .iter()
            .filter(|r| r.status == HealthStatus::Down)
            .map(|r| FailureEntry {
                name: r.name.clone(),
                error: r.error.clone().unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            })
            .collect();

        Self {
            total,
            up,
            down,
            success_rate,
            response_times: response_time_stats(&up_times),
            failures,
            all_up: up == total,
        }
    }

    /// 成功率文本，保留一位小数
    pub fn success_rate_display(&self) -> String {
        self.success_rate
            .map(|rate| format!("{rate:.1}%"))
            .unwrap_or_else(|| "N/A".to_string())
    }
}

fn response_time_stats(times: &[f64]) -> Option<ResponseTimeStats> {
    if times.is_empty() {
        return None;
    }

    let sum: f64 = times.iter().sum();
    let min_ms = times.iter().copied().fold(f64::INFINITY, f64::min);
    let max_ms = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some(ResponseTimeStats {
        avg_ms: sum / times.len() as f64,
        min_ms,
        max_ms,
    })
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "📊 HEALTH CHECK SUMMARY")?;
        writeln!(f, "Total Applications: {}", self.total)?;
        writeln!(f, "✅ UP: {}", self.up)?;
        writeln!(f, "❌ DOWN: {}", self.down)?;
        writeln!(f, "📈 Success Rate: {}", self.success_rate_display())?;

        if let Some(times) = &self.response_times {
            writeln!(
                f,
                "⏱️  Response Times - Avg: {:.2}ms, Min: {:.2}ms, Max: {:.2}ms",
                times.avg_ms, times.min_ms, times.max_ms
            )?;
        }

        if !self.failures.is_empty() {
            writeln!(f)?;
            writeln!(f, "🔴 DOWN APPLICATIONS:")?;
            for failure in &self.failures {
                writeln!(f, "   - {}: {}", failure.name, failure.error)?;
            }
        }

        Ok(())
    }
}
