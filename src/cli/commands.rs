//! 命令处理逻辑
//!
//! 把配置、检测目标、检测器、结果输出和告警串成一次完整的检测运行

use crate::cli::args::{Args, OutputFormat};
use crate::config::{validate_config, Config, FileConfigLoader};
use crate::error::{ConfigError, Result};
use crate::health::{
    default_targets, CheckResult, HealthChecker, HttpHealthChecker, Report, TargetSpec,
};
use crate::notification::{notify_failures, AlertTemplate, NotificationSender, SmtpSender};
use crate::sink::{JsonFileSink, ResultSink};
use std::path::PathBuf;
use tracing::{info, warn};

/// 全部 UP
pub const EXIT_ALL_UP: i32 = 0;
/// 至少一个 DOWN
pub const EXIT_SOME_DOWN: i32 = 1;
/// 检测开始前的致命错误（目标文件缺失或无效、参数非法）
pub const EXIT_FATAL: i32 = 2;

const SEPARATOR_WIDTH: usize = 60;

/// 一次检测运行的产出
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// 按提交顺序排列的检测结果
    pub results: Vec<CheckResult>,
    /// 汇总报告
    pub report: Report,
    /// 结果文件路径（如果保存成功）
    pub saved_to: Option<PathBuf>,
    /// 是否发送了告警
    pub alert_sent: bool,
}

impl RunOutcome {
    /// 进程退出码
    pub fn exit_code(&self) -> i32 {
        if self.results.iter().all(|r| r.status.is_healthy()) {
            EXIT_ALL_UP
        } else {
            EXIT_SOME_DOWN
        }
    }
}

/// 检测运行器
///
/// 结果输出和告警都是可选的，失败时只记录警告
pub struct CheckRunner<'a> {
    checker: &'a dyn HealthChecker,
    format: OutputFormat,
    sink: Option<(&'a dyn ResultSink, Option<PathBuf>)>,
    notifier: Option<(&'a dyn NotificationSender, AlertTemplate)>,
}

impl<'a> CheckRunner<'a> {
    /// 创建运行器
    pub fn new(checker: &'a dyn HealthChecker, format: OutputFormat) -> Self {
        Self {
            checker,
            format,
            sink: None,
            notifier: None,
        }
    }

    /// 启用结果保存，`destination` 为空时由输出实现生成文件名
    pub fn with_sink(mut self, sink: &'a dyn ResultSink, destination: Option<PathBuf>) -> Self {
        self.sink = Some((sink, destination));
        self
    }

    /// 启用失败告警
    pub fn with_notifier(
        mut self,
        notifier: &'a dyn NotificationSender,
        template: AlertTemplate,
    ) -> Self {
        self.notifier = Some((notifier, template));
        self
    }

    /// 执行检测并输出报告
    pub async fn run(&self, targets: &[TargetSpec]) -> Result<RunOutcome> {
        let text = self.format == OutputFormat::Text;
        let separator = "=".repeat(SEPARATOR_WIDTH);

        if text {
            println!("🚀 Starting Application Health Check...");
            println!("{separator}");
        }

        info!("开始检测 {} 个目标", targets.len());
        let results = self.checker.check_all(targets).await;
        let report = Report::summarize(&results);

        match self.format {
            OutputFormat::Text => print!("{}", text_summary(&report)),
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "summary": report,
                    "results": results,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
        }

        let saved_to = match &self.sink {
            Some((sink, destination)) => match sink.persist(&results, destination.as_deref()).await
            {
                Ok(path) => {
                    if text {
                        println!("💾 Results saved to {}", path.display());
                    }
                    Some(path)
                }
                Err(e) => {
                    warn!("保存检测结果失败: {}", e);
                    None
                }
            },
            None => None,
        };

        let alert_sent = match &self.notifier {
            Some((notifier, template)) if !report.all_up => {
                let sent = notify_failures(*notifier, template, &report).await;
                if sent && text {
                    println!("📧 Alert sent via {}", notifier.name());
                }
                sent
            }
            _ => false,
        };

        info!(
            total = report.total,
            up = report.up,
            down = report.down,
            "检测完成"
        );

        Ok(RunOutcome {
            results,
            report,
            saved_to,
            alert_sent,
        })
    }
}

/// 检测结束后的文本汇总：分隔线、空行、报告
fn text_summary(report: &Report) -> String {
    format!("{}\n\n{report}", "=".repeat(SEPARATOR_WIDTH))
}

/// 检测命令
pub struct CheckCommand;

impl CheckCommand {
    /// 执行检测命令
    ///
    /// # 参数
    /// * `args` - 命令行参数
    ///
    /// # 返回
    /// * `Result<RunOutcome>` - 运行产出；错误表示检测开始前的致命问题
    pub async fn execute(&self, args: &Args) -> Result<RunOutcome> {
        let loader = FileConfigLoader::new(true);
        let config = loader
            .load_or_default(args.get_config_path().as_deref())
            .await;
        let config = apply_overrides(config, args)?;

        let targets = resolve_targets(args, &loader).await?;

        let checker =
            HttpHealthChecker::new(&config)?.with_progress(args.format == OutputFormat::Text);
        let sink = JsonFileSink;
        let sender = SmtpSender::from_config(&config);

        let mut runner = CheckRunner::new(&checker, args.format.clone());

        if let Some(destination) = args.save_destination() {
            runner = runner.with_sink(&sink, destination);
        }

        if args.email {
            if config.alert_email.is_none() {
                warn!("已指定 --email 但配置中没有 alert_email，跳过告警");
            } else {
                match AlertTemplate::new(config.alert_template.as_deref()) {
                    Ok(template) => runner = runner.with_notifier(&sender, template),
                    Err(e) => warn!("告警模板无效，跳过告警: {}", e),
                }
            }
        }

        runner.run(&targets).await
    }
}

/// 用命令行参数覆盖配置项并重新验证
pub fn apply_overrides(mut config: Config, args: &Args) -> Result<Config> {
    if let Some(timeout) = args.timeout {
        config.timeout = timeout;
    }
    if let Some(attempts) = args.retry_attempts {
        config.retry_attempts = attempts;
    }
    if let Some(max_concurrent) = args.max_concurrent {
        config.max_concurrent_checks = max_concurrent as usize;
    }
    if args.verify_tls {
        config.verify_tls = true;
    }

    validate_config(&config).map_err(ConfigError::ValidationError)?;
    Ok(config)
}

/// 确定检测目标：单个URL、目标文件或内置默认列表
pub async fn resolve_targets(args: &Args, loader: &FileConfigLoader) -> Result<Vec<TargetSpec>> {
    if let Some(url) = &args.url {
        return Ok(vec![TargetSpec::new(url.clone())]);
    }

    if let Some(file) = &args.file {
        return loader.load_targets(file).await;
    }

    info!("未指定检测目标，使用内置默认列表");
    Ok(default_targets())
}
