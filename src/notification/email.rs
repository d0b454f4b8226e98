//! 邮件通知发送器模块
//!
//! 通过 SMTP 发送告警邮件，发件人与收件人都是配置的告警邮箱

use crate::config::Config;
use crate::notification::sender::NotificationSender;
use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;
use tracing::{debug, info};

/// SMTP邮件发送器
pub struct SmtpSender {
    /// 告警邮箱，未配置时不发送
    alert_email: Option<String>,
    /// SMTP服务器地址
    smtp_server: String,
    /// SMTP服务器端口
    smtp_port: u16,
    /// 连接超时，与HTTP请求超时一致
    timeout: Duration,
}

impl SmtpSender {
    /// 从配置创建邮件发送器
    pub fn from_config(config: &Config) -> Self {
        Self {
            alert_email: config.alert_email.clone(),
            smtp_server: config.smtp_server.clone(),
            smtp_port: config.smtp_port,
            timeout: config.timeout_duration(),
        }
    }

    /// 构建邮件
    fn build_message(address: &str, subject: &str, body: &str) -> Result<Message> {
        let mailbox: Mailbox = address
            .parse()
            .with_context(|| format!("无效的告警邮箱: {address}"))?;

        Message::builder()
            .from(mailbox.clone())
            .to(mailbox)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .context("构建邮件失败")
    }
}

#[async_trait]
impl NotificationSender for SmtpSender {
    async fn send(&self, subject: &str, body: &str) -> Result<()> {
        let Some(address) = &self.alert_email else {
            debug!("未配置告警邮箱，跳过邮件通知");
            return Ok(());
        };

        let message = Self::build_message(address, subject, body)?;

        debug!("发送告警邮件到 {}:{}", self.smtp_server, self.smtp_port);
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.smtp_server)
            .port(self.smtp_port)
            .timeout(Some(self.timeout))
            .build();

        mailer.send(message).await.context("SMTP发送失败")?;

        info!("告警邮件已发送至 {}", address);
        Ok(())
    }

    fn name(&self) -> &str {
        "email"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_without_alert_email_is_noop() {
        let sender = SmtpSender::from_config(&Config::default());
        assert!(sender.send("subject", "body").await.is_ok());
    }

    #[test]
    fn test_build_message() {
        let message =
            SmtpSender::build_message("ops@example.com", "Alert", "DB is down").unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("From: "));
        assert!(raw.contains("To: "));
        assert!(raw.contains("ops@example.com"));
        assert!(raw.contains("Subject: Alert"));
        assert!(raw.contains("DB is down"));
    }

    #[test]
    fn test_build_message_invalid_address() {
        assert!(SmtpSender::build_message("not an address", "Alert", "body").is_err());
    }

    #[tokio::test]
    async fn test_send_to_unreachable_server_fails() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let config = Config {
            alert_email: Some("ops@example.com".to_string()),
            smtp_server: "127.0.0.1".to_string(),
            smtp_port: port,
            timeout: 2.0,
            ..Default::default()
        };
        let sender = SmtpSender::from_config(&config);
        assert_eq!(sender.timeout, Duration::from_secs(2));

        assert!(sender.send("Alert", "body").await.is_err());
    }
}
