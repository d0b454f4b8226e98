//! 错误处理模块
//!
//! 定义应用程序的统一错误类型

use thiserror::Error;

/// App Vitals 应用程序的主要错误类型
#[derive(Error, Debug)]
pub enum AppVitalsError {
    /// 配置相关错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 健康检测相关错误
    #[error("健康检测错误: {0}")]
    HealthCheck(#[from] HealthCheckError),

    /// JSON序列化错误
    #[error("JSON错误: {0}")]
    Json(#[from] serde_json::Error),
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 配置文件解析错误
    #[error("配置文件解析失败: {0}")]
    ParseError(String),

    /// 配置验证错误
    #[error("配置验证失败: {0}")]
    ValidationError(String),

    /// 配置文件不存在
    #[error("文件不存在: {path}")]
    FileNotFound { path: String },

    /// 环境变量替换错误
    #[error("环境变量替换失败: {var}")]
    EnvVarError { var: String },
}

/// 健康检测错误类型
///
/// 这些错误只在单次尝试内部流转，最终都会被折算成 DOWN 结果
#[derive(Error, Debug)]
pub enum HealthCheckError {
    /// HTTP传输失败（连接、DNS、读取响应体等）
    #[error("{0}")]
    Transport(String),

    /// 超时错误
    #[error("Request timeout after {0:?}")]
    Timeout(std::time::Duration),

    /// 请求无法构建（非法的HTTP方法）
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// HTTP客户端创建失败
    #[error("HTTP客户端创建失败: {0}")]
    ClientBuild(#[from] reqwest::Error),
}

impl HealthCheckError {
    /// 是否值得重试
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            HealthCheckError::Transport(_) | HealthCheckError::Timeout(_)
        )
    }
}

/// 通知错误类型
#[derive(Error, Debug)]
pub enum NotificationError {
    /// 模板渲染错误
    #[error("模板渲染失败: {0}")]
    TemplateError(String),
}

/// 结果持久化错误类型
#[derive(Error, Debug)]
pub enum SinkError {
    /// 序列化失败
    #[error("结果序列化失败: {0}")]
    Serialize(#[from] serde_json::Error),

    /// 写入文件失败
    #[error("写入文件 {path} 失败: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, AppVitalsError>;
