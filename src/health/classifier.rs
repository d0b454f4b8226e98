//! 响应判定
//!
//! 根据状态码和响应体关键字判定 UP/DOWN

use crate::config::Config;
use crate::health::result::{ContentAnalysis, HealthStatus};

/// 响应判定器，关键字在构造时统一转为小写
#[derive(Debug, Clone)]
pub struct Classifier {
    expected_status_codes: Vec<u16>,
    critical_keywords: Vec<String>,
    success_keywords: Vec<String>,
}

impl Classifier {
    /// 从配置创建判定器
    pub fn new(config: &Config) -> Self {
        Self {
            expected_status_codes: config.expected_status_codes.clone(),
            critical_keywords: lowercase_all(&config.critical_keywords),
            success_keywords: lowercase_all(&config.success_keywords),
        }
    }

    /// 验证响应状态码
    pub fn validate_status_code(&self, status_code: u16) -> bool {
        self.expected_status_codes.contains(&status_code)
    }

    /// 分析响应体中的关键字（不区分大小写的子串匹配）
    pub fn analyze(&self, body: &str) -> ContentAnalysis {
        let content = body.to_lowercase();

        ContentAnalysis {
            has_critical_keywords: contains_any(&content, &self.critical_keywords),
            has_success_keywords: contains_any(&content, &self.success_keywords),
        }
    }

    /// 判定一次完整响应
    ///
    /// 状态码在期望集合中且没有严重关键字时为 UP，否则为 DOWN。
    /// 成功关键字只记录在分析结果里。
    pub fn classify(&self, status_code: u16, body: &str) -> (HealthStatus, ContentAnalysis) {
        let analysis = self.analyze(body);
        let status = if self.validate_status_code(status_code) && !analysis.has_critical_keywords {
            HealthStatus::Up
        } else {
            HealthStatus::Down
        };

        (status, analysis)
    }
}

fn lowercase_all(keywords: &[String]) -> Vec<String> {
    keywords.iter().map(|k| k.to_lowercase()).collect()
}

fn contains_any(content: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|keyword| content.contains(keyword.as_str()))
}
