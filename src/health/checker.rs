//! HTTP健康检测器实现
//!
//! 对单个目标执行请求与重试，并对目标列表按提交顺序给出检测结果

use crate::config::Config;
use crate::error::{HealthCheckError, Result};
use crate::health::classifier::Classifier;
use crate::health::result::CheckResult;
use crate::health::target::TargetSpec;
use crate::health::transport::{HttpResponse, ReqwestTransport, Transport};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::time::Duration;
use tracing::{info, warn};

/// 健康检测器trait，定义检测接口
#[async_trait]
pub trait HealthChecker: Send + Sync {
    /// 检测单个目标
    ///
    /// 不会返回错误：所有传输失败在用尽重试后都折算为 DOWN 结果
    async fn check(&self, target: &TargetSpec) -> CheckResult;

    /// 检测目标列表
    ///
    /// 每个目标恰好产生一个结果，结果顺序与提交顺序一致
    async fn check_all(&self, targets: &[TargetSpec]) -> Vec<CheckResult>;
}

/// HTTP健康检测器实现
pub struct HttpHealthChecker<T: Transport = ReqwestTransport> {
    /// 传输层
    transport: T,
    /// 响应判定器
    classifier: Classifier,
    /// 最大尝试次数
    retry_attempts: u32,
    /// 重试间隔
    retry_delay: Duration,
    /// 最大并发检测数
    max_concurrent: usize,
    /// 是否在标准输出打印检测进度
    progress: bool,
}

impl HttpHealthChecker<ReqwestTransport> {
    /// 使用默认的 reqwest 传输创建检测器
    ///
    /// # 参数
    /// * `config` - 全局配置
    ///
    /// # 返回
    /// * `Result<Self>` - 检测器实例
    pub fn new(config: &Config) -> Result<Self> {
        let transport = ReqwestTransport::new(config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> HttpHealthChecker<T> {
    /// 使用指定的传输层创建检测器
    pub fn with_transport(config: &Config, transport: T) -> Self {
        Self {
            transport,
            classifier: Classifier::new(config),
            retry_attempts: config.retry_attempts.max(1),
            retry_delay: config.retry_delay_duration(),
            max_concurrent: config.max_concurrent_checks.max(1),
            progress: true,
        }
    }

    /// 开启或关闭进度输出
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// 根据收到的响应生成结果
    fn process_response(&self, target: &TargetSpec, response: HttpResponse) -> CheckResult {
        let (status, analysis) = self
            .classifier
            .classify(response.status_code, &response.body);

        CheckResult::from_response(
            target.display_name().to_string(),
            target.url.clone(),
            status,
            response.status_code,
            response.elapsed,
            analysis,
        )
    }

    /// 创建传输失败结果
    fn create_error_result(&self, target: &TargetSpec, error: &HealthCheckError) -> CheckResult {
        CheckResult::transport_failure(
            target.display_name().to_string(),
            target.url.clone(),
            error.to_string(),
        )
    }
}

#[async_trait]
impl<T: Transport> HealthChecker for HttpHealthChecker<T> {
    async fn check(&self, target: &TargetSpec) -> CheckResult {
        let name = target.display_name();
        if self.progress {
            println!("🔍 Checking {name}...");
        }

        let mut attempt = 1;
        loop {
            match self.transport.execute(target).await {
                Ok(response) => {
                    let result = self.process_response(target, response);
                    if self.progress {
                        println!(
                            "{} {}: {} (Status: {}, Response Time: {}ms)",
                            result.status.emoji(),
                            name,
                            result.status,
                            result.status_code.unwrap_or_default(),
                            result.response_time_ms.unwrap_or_default()
                        );
                    }
                    info!(
                        target_name = name,
                        status = %result.status,
                        status_code = result.status_code,
                        response_time_ms = result.response_time_ms,
                        "检测完成"
                    );
                    return result;
                }
                Err(e) if e.is_retryable() && attempt < self.retry_attempts => {
                    warn!("{} 第 {} 次尝试失败: {}，准备重试", name, attempt, e);
                    if self.progress {
                        println!("⚠️  Attempt {attempt} failed for {name}. Retrying...");
                    }
                    tokio::time::sleep(self.retry_delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    let result = self.create_error_result(target, &e);
                    if self.progress {
                        println!("❌ {name}: DOWN (Error: {e})");
                    }
                    warn!("{} 检测失败（共尝试 {} 次）: {}", name, attempt, e);
                    return result;
                }
            }
        }
    }

    async fn check_all(&self, targets: &[TargetSpec]) -> Vec<CheckResult> {
        let checks: Vec<_> = targets.iter().map(|target| self.check(target)).collect();

        // buffered 按提交顺序产出结果，并发为1时即顺序执行
        stream::iter(checks)
            .buffered(self.max_concurrent)
            .collect()
            .await
    }
}
