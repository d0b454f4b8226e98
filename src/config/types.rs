//! 配置数据结构定义
//!
//! 定义应用程序的配置结构体和验证逻辑

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 主配置结构
///
/// 配置文件可以只覆盖其中任意一部分字段，缺失的字段使用默认值，
/// 未知字段会被忽略。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// 请求超时时间（秒）
    pub timeout: f64,
    /// 每个目标的最大尝试次数（至少为1）
    pub retry_attempts: u32,
    /// 重试间隔（秒）
    pub retry_delay: f64,
    /// 期望的状态码列表
    pub expected_status_codes: Vec<u16>,
    /// 严重关键字，响应体中出现任意一个即判定为 DOWN
    pub critical_keywords: Vec<String>,
    /// 成功关键字，仅记录，不影响判定
    pub success_keywords: Vec<String>,
    /// 告警邮箱（同时作为发件人和收件人）
    pub alert_email: Option<String>,
    /// SMTP服务器地址
    pub smtp_server: String,
    /// SMTP服务器端口
    pub smtp_port: u16,
    /// 是否校验服务端证书
    pub verify_tls: bool,
    /// 最大并发检测数，1 表示严格顺序执行
    pub max_concurrent_checks: usize,
    /// 告警正文的 Handlebars 模板
    pub alert_template: Option<String>,
    /// 自定义 User-Agent
    pub user_agent: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            retry_attempts: default_retry_attempts(),
            retry_delay: default_retry_delay(),
            expected_status_codes: default_expected_status_codes(),
            critical_keywords: default_critical_keywords(),
            success_keywords: default_success_keywords(),
            alert_email: None,
            smtp_server: default_smtp_server(),
            smtp_port: default_smtp_port(),
            verify_tls: false,
            max_concurrent_checks: default_max_concurrent(),
            alert_template: None,
            user_agent: None,
        }
    }
}

/// 超时和重试间隔的上限（秒）
pub const MAX_DURATION_SECS: f64 = 86_400.0;

impl Config {
    /// 请求超时时间，无法表示时退回默认值
    pub fn timeout_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout)
            .unwrap_or_else(|_| Duration::from_secs_f64(default_timeout()))
    }

    /// 重试间隔，无法表示时退回默认值
    pub fn retry_delay_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.retry_delay)
            .unwrap_or_else(|_| Duration::from_secs_f64(default_retry_delay()))
    }
}

// 默认值函数
fn default_timeout() -> f64 {
    10.0
}
fn default_retry_attempts() -> u32 {
    3
}
fn default_retry_delay() -> f64 {
    2.0
}
fn default_expected_status_codes() -> Vec<u16> {
    vec![200, 201, 202, 204]
}
fn default_critical_keywords() -> Vec<String> {
    ["error", "exception", "down", "maintenance"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_success_keywords() -> Vec<String> {
    ["success", "ok", "running", "healthy"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_smtp_server() -> String {
    "localhost".to_string()
}
fn default_smtp_port() -> u16 {
    587
}
fn default_max_concurrent() -> usize {
    1
}

/// 配置验证函数
///
/// # 参数
/// * `config` - 要验证的配置
///
/// # 返回
/// * `Result<(), String>` - 验证结果，错误时返回错误信息
pub fn validate_config(config: &Config) -> Result<(), String> {
    if !config.timeout.is_finite() || config.timeout <= 0.0 {
        return Err(format!("请求超时时间必须大于0: {}", config.timeout));
    }

    if config.timeout > MAX_DURATION_SECS {
        return Err(format!(
            "请求超时时间不能超过 {MAX_DURATION_SECS} 秒: {}",
            config.timeout
        ));
    }

    if config.retry_attempts == 0 {
        return Err("重试次数至少为1".to_string());
    }

    if !config.retry_delay.is_finite() || config.retry_delay < 0.0 {
        return Err(format!("重试间隔不能为负数: {}", config.retry_delay));
    }

    if config.retry_delay > MAX_DURATION_SECS {
        return Err(format!(
            "重试间隔不能超过 {MAX_DURATION_SECS} 秒: {}",
            config.retry_delay
        ));
    }

    if config.max_concurrent_checks == 0 {
        return Err("最大并发检测数不能为0".to_string());
    }

    if config.expected_status_codes.is_empty() {
        return Err("必须指定期望的状态码".to_string());
    }

    for &code in &config.expected_status_codes {
        if !(100..=599).contains(&code) {
            return Err(format!("状态码 {code} 无效"));
        }
    }

    if config
        .critical_keywords
        .iter()
        .chain(config.success_keywords.iter())
        .any(|k| k.is_empty())
    {
        return Err("关键字不能为空字符串".to_string());
    }

    if let Some(email) = &config.alert_email {
        if !email.contains('@') {
            return Err(format!("告警邮箱格式无效: {email}"));
        }
    }

    if config.smtp_port == 0 {
        return Err("SMTP端口不能为0".to_string());
    }

    Ok(())
}
