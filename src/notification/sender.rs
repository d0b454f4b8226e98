//! 通知发送器模块
//!
//! 定义通知发送的trait、基础实现以及尽力而为的告警入口

use crate::health::Report;
use crate::notification::template::AlertTemplate;
use anyhow::Result;
use async_trait::async_trait;
use tracing::{info, warn};

/// 通知发送器trait
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// 发送通知
    ///
    /// # 参数
    /// * `subject` - 通知标题
    /// * `body` - 通知正文
    ///
    /// # 返回
    /// * `Result<()>` - 发送结果
    async fn send(&self, subject: &str, body: &str) -> Result<()>;

    /// 发送器名称，用于日志
    fn name(&self) -> &str;
}

/// 存在 DOWN 结果时发送告警
///
/// 发送失败只记录警告，不影响报告和退出码。
///
/// # 返回
/// * `bool` - 是否成功发送了告警
pub async fn notify_failures(
    sender: &dyn NotificationSender,
    template: &AlertTemplate,
    report: &Report,
) -> bool {
    if report.failures.is_empty() {
        return false;
    }

    let message = match template.render(&report.failures) {
        Ok(message) => message,
        Err(e) => {
            warn!("告警消息渲染失败: {}", e);
            return false;
        }
    };

    match sender.send(&message.subject, &message.body).await {
        Ok(()) => {
            info!("通过 {} 发送告警成功", sender.name());
            true
        }
        Err(e) => {
            warn!("通过 {} 发送告警失败: {:#}", sender.name(), e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::{CheckResult, ContentAnalysis, HealthStatus};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingSender {
        sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl NotificationSender for RecordingSender {
        async fn send(&self, subject: &str, body: &str) -> Result<()> {
            self.sent
                .lock()
                .unwrap()
                .push((subject.to_string(), body.to_string()));
            Ok(())
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    struct FailingSender;

    #[async_trait]
    impl NotificationSender for FailingSender {
        async fn send(&self, _subject: &str, _body: &str) -> Result<()> {
            Err(anyhow::anyhow!("SMTP connection refused"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn report_with_failures() -> Report {
        Report::summarize(&[
            CheckResult::from_response(
                "API".to_string(),
                "https://api.example.com".to_string(),
                HealthStatus::Up,
                200,
                Duration::from_millis(10),
                ContentAnalysis {
                    has_critical_keywords: false,
                    has_success_keywords: true,
                },
            ),
            CheckResult::transport_failure(
                "DB".to_string(),
                "https://db.example.com".to_string(),
                "Connection failed".to_string(),
            ),
        ])
    }

    #[tokio::test]
    async fn test_notify_sends_alert_for_failures() {
        let sender = RecordingSender::default();
        let template = AlertTemplate::new(None).unwrap();

        let sent = notify_failures(&sender, &template, &report_with_failures()).await;

        assert!(sent);
        let messages = sender.sent.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].0.contains("1 apps down"));
        assert!(messages[0].1.contains("- DB: Connection failed"));
        assert!(!messages[0].1.contains("API"));
    }

    #[tokio::test]
    async fn test_notify_skips_when_all_up() {
        let sender = RecordingSender::default();
        let template = AlertTemplate::new(None).unwrap();
        let report = Report::summarize(&[]);

        assert!(!notify_failures(&sender, &template, &report).await);
        assert!(sender.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_notify_swallows_send_errors() {
        let template = AlertTemplate::new(None).unwrap();
        let sent = notify_failures(&FailingSender, &template, &report_with_failures()).await;
        assert!(!sent);
    }
}
