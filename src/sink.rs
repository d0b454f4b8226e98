//! 检测结果持久化
//!
//! 将一次运行的检测结果写为JSON数组文件

use crate::error::SinkError;
use crate::health::CheckResult;
use async_trait::async_trait;
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::info;

/// 结果输出trait
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// 持久化检测结果
    ///
    /// # 参数
    /// * `results` - 按提交顺序排列的检测结果
    /// * `destination` - 目标路径，为空时由实现生成默认名称
    ///
    /// # 返回
    /// * `Result<PathBuf, SinkError>` - 实际写入的路径
    async fn persist(
        &self,
        results: &[CheckResult],
        destination: Option<&Path>,
    ) -> Result<PathBuf, SinkError>;
}

/// JSON文件输出
#[derive(Debug, Clone, Default)]
pub struct JsonFileSink;

impl JsonFileSink {
    /// 带时间戳的默认文件名，例如 `health_check_20240101_120000.json`
    pub fn default_file_name() -> PathBuf {
        PathBuf::from(format!(
            "health_check_{}.json",
            Local::now().format("%Y%m%d_%H%M%S")
        ))
    }
}

#[async_trait]
impl ResultSink for JsonFileSink {
    async fn persist(
        &self,
        results: &[CheckResult],
        destination: Option<&Path>,
    ) -> Result<PathBuf, SinkError> {
        let path = destination
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_file_name);

        let content = serde_json::to_string_pretty(results)?;

        tokio::fs::write(&path, content)
            .await
            .map_err(|source| SinkError::Write {
                path: path.display().to_string(),
                source,
            })?;

        info!("已保存 {} 条检测结果到 {}", results.len(), path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::HealthStatus;
    use tempfile::TempDir;

    fn results() -> Vec<CheckResult> {
        vec![
            CheckResult::transport_failure(
                "A".to_string(),
                "https://a.example.com".to_string(),
                "Connection failed".to_string(),
            ),
            CheckResult::transport_failure(
                "B".to_string(),
                "https://b.example.com".to_string(),
                "Request timeout".to_string(),
            ),
        ]
    }

    #[tokio::test]
    async fn test_persist_to_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results.json");

        let written = JsonFileSink.persist(&results(), Some(&path)).await.unwrap();
        assert_eq!(written, path);

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<CheckResult> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].name, "A");
        assert_eq!(parsed[1].name, "B");
        assert_eq!(parsed[1].status, HealthStatus::Down);
    }

    #[tokio::test]
    async fn test_persist_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("results.json");

        let result = JsonFileSink.persist(&results(), Some(&path)).await;
        assert!(matches!(result, Err(SinkError::Write { .. })));
    }

    #[test]
    fn test_default_file_name() {
        let name = JsonFileSink::default_file_name();
        let name = name.to_string_lossy();

        assert!(name.starts_with("health_check_"));
        assert!(name.ends_with(".json"));
        // health_check_YYYYMMDD_HHMMSS.json
        assert_eq!(name.len(), "health_check_".len() + 15 + ".json".len());
    }
}
