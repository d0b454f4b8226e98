//! HTTP传输层
//!
//! 负责执行单次HTTP请求，检测器通过 [`Transport`] trait 使用它

use crate::config::Config;
use crate::error::HealthCheckError;
use crate::health::target::TargetSpec;
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::debug;

/// 一次成功的HTTP交换
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP状态码
    pub status_code: u16,
    /// 响应体文本
    pub body: String,
    /// 从发出请求到读完响应体的耗时
    pub elapsed: Duration,
}

/// 传输层trait
#[async_trait]
pub trait Transport: Send + Sync {
    /// 执行一次请求
    ///
    /// 收到任意状态码的响应都返回 `Ok`，只有传输失败才返回错误
    async fn execute(&self, target: &TargetSpec) -> Result<HttpResponse, HealthCheckError>;
}

/// 基于 reqwest 的传输实现
pub struct ReqwestTransport {
    /// HTTP客户端
    client: Client,
    /// 请求超时时间
    timeout: Duration,
}

impl ReqwestTransport {
    /// 创建新的传输实例
    ///
    /// 默认不校验服务端证书，`verify_tls` 为 true 时开启校验
    pub fn new(config: &Config) -> Result<Self, HealthCheckError> {
        let timeout = config.timeout_duration();
        let user_agent = config
            .user_agent
            .clone()
            .unwrap_or_else(|| format!("{}/{}", crate::APP_NAME, crate::VERSION));

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()?;

        Ok(Self { client, timeout })
    }

    /// 构建HTTP请求
    fn build_request(
        &self,
        target: &TargetSpec,
    ) -> Result<reqwest::RequestBuilder, HealthCheckError> {
        let method = Method::from_bytes(target.method.to_uppercase().as_bytes()).map_err(|_| {
            HealthCheckError::InvalidRequest(format!("无效的HTTP方法: {}", target.method))
        })?;

        let mut request = self.client.request(method, &target.url);

        for (key, value) in &target.headers {
            request = request.header(key, value);
        }

        match &target.body {
            Some(Value::String(text)) => request = request.body(text.clone()),
            Some(body) => request = request.json(body),
            None => {}
        }

        Ok(request)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, target: &TargetSpec) -> Result<HttpResponse, HealthCheckError> {
        let request = self.build_request(target)?;
        let start_time = Instant::now();

        let exchange = async {
            let response = request.send().await?;
            let status_code = response.status().as_u16();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>((status_code, body))
        };

        match timeout(self.timeout, exchange).await {
            Ok(Ok((status_code, body))) => {
                let elapsed = start_time.elapsed();
                debug!(
                    "{} {} -> {} ({:?})",
                    target.method, target.url, status_code, elapsed
                );
                Ok(HttpResponse {
                    status_code,
                    body,
                    elapsed,
                })
            }
            Ok(Err(e)) => Err(format_request_error(&e, self.timeout)),
            Err(_) => Err(HealthCheckError::Timeout(self.timeout)),
        }
    }
}

/// 将 reqwest 错误转换为清晰易读的错误
fn format_request_error(error: &reqwest::Error, timeout: Duration) -> HealthCheckError {
    if error.is_timeout() {
        HealthCheckError::Timeout(timeout)
    } else if error.is_builder() {
        HealthCheckError::Transport(format!("Invalid URL: {error}"))
    } else if error.is_connect() {
        HealthCheckError::Transport(format!("Connection failed: {error}"))
    } else if error.is_decode() || error.is_body() {
        HealthCheckError::Transport(format!("Response read error: {error}"))
    } else {
        let error_str = error.to_string();
        if error_str.contains("dns") || error_str.contains("DNS") {
            HealthCheckError::Transport(format!("DNS resolution failed: {error_str}"))
        } else {
            HealthCheckError::Transport(format!("Request failed: {error_str}"))
        }
    }
}
