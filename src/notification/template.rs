//! 消息模板模块
//!
//! 使用 Handlebars 渲染告警正文

use crate::error::NotificationError;
use crate::health::FailureEntry;
use handlebars::Handlebars;
use serde_json::json;

const TEMPLATE_NAME: &str = "alert";

/// 默认的告警正文模板
pub const DEFAULT_ALERT_TEMPLATE: &str =
    "The following applications are down:\n{{#each failures}}- {{name}}: {{error}}\n{{/each}}";

/// 渲染后的告警消息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    /// 邮件标题
    pub subject: String,
    /// 邮件正文
    pub body: String,
}

/// 告警模板
///
/// 模板上下文包含 `failures`（每项有 `name` 和 `error`）与 `count`
pub struct AlertTemplate {
    registry: Handlebars<'static>,
}

impl AlertTemplate {
    /// 创建告警模板，`None` 时使用默认模板
    ///
    /// # 返回
    /// * `Result<Self, NotificationError>` - 模板语法错误时返回错误
    pub fn new(template: Option<&str>) -> Result<Self, NotificationError> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        registry.set_strict_mode(true);
        registry
            .register_template_string(TEMPLATE_NAME, template.unwrap_or(DEFAULT_ALERT_TEMPLATE))
            .map_err(|e| NotificationError::TemplateError(e.to_string()))?;

        Ok(Self { registry })
    }

    /// 根据 DOWN 结果渲染告警消息
    pub fn render(&self, failures: &[FailureEntry]) -> Result<AlertMessage, NotificationError> {
        let context = json!({
            "failures": failures,
            "count": failures.len(),
        });

        let body = self
            .registry
            .render(TEMPLATE_NAME, &context)
            .map_err(|e| NotificationError::TemplateError(e.to_string()))?;

        Ok(AlertMessage {
            subject: alert_subject(failures.len()),
            body,
        })
    }
}

/// 告警标题
pub fn alert_subject(down_count: usize) -> String {
    format!("🚨 Application Health Alert - {down_count} apps down")
}
