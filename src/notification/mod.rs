//! 通知模块
//!
//! 提供邮件告警和告警消息模板功能

pub mod email;
pub mod sender;
pub mod template;

// 重新导出主要类型
pub use email::SmtpSender;
pub use sender::{notify_failures, NotificationSender};
pub use template::{AlertMessage, AlertTemplate};
