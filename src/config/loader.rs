//! 配置加载器实现
//!
//! 提供JSON/TOML配置文件解析、环境变量替换、检测目标列表加载和错误处理功能

use crate::config::types::{validate_config, Config};
use crate::error::{ConfigError, Result};
use crate::health::TargetSpec;
use async_trait::async_trait;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// 配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON格式（默认）
    Json,
    /// TOML格式
    Toml,
}

impl ConfigFormat {
    /// 根据文件扩展名推断格式，未知扩展名按JSON处理
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }
}

/// 配置加载器trait，定义配置加载接口
#[async_trait]
pub trait ConfigLoader: Send + Sync {
    /// 从文件加载配置
    ///
    /// # 参数
    /// * `path` - 配置文件路径
    ///
    /// # 返回
    /// * `Result<Config>` - 加载的配置或错误
    async fn load_from_file<P: AsRef<Path> + Send>(&self, path: P) -> Result<Config>;

    /// 从字符串加载配置
    ///
    /// # 参数
    /// * `content` - 配置文件内容
    /// * `format` - 配置格式
    ///
    /// # 返回
    /// * `Result<Config>` - 加载的配置或错误
    async fn load_from_string(&self, content: &str, format: ConfigFormat) -> Result<Config>;

    /// 验证配置
    fn validate(&self, config: &Config) -> Result<()>;
}

/// 基于文件的配置加载器，支持JSON和TOML
#[derive(Debug, Clone)]
pub struct FileConfigLoader {
    /// 是否启用环境变量替换
    enable_env_substitution: bool,
}

impl Default for FileConfigLoader {
    fn default() -> Self {
        Self::new(true)
    }
}

impl FileConfigLoader {
    /// 创建新的配置加载器
    ///
    /// # 参数
    /// * `enable_env_substitution` - 是否启用环境变量替换
    pub fn new(enable_env_substitution: bool) -> Self {
        Self {
            enable_env_substitution,
        }
    }

    /// 替换字符串中的 `${VAR_NAME}` 环境变量
    fn substitute_env_vars(&self, content: &str) -> Result<String> {
        if !self.enable_env_substitution {
            return Ok(content.to_string());
        }

        let env_var_regex = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}")
            .map_err(|e| ConfigError::ParseError(format!("正则表达式错误: {e}")))?;

        let mut result = content.to_string();

        for captures in env_var_regex.captures_iter(content) {
            let full_match = &captures[0];
            let var_name = &captures[1];

            match std::env::var(var_name) {
                Ok(value) => {
                    result = result.replace(full_match, &value);
                }
                Err(_) => {
                    return Err(ConfigError::EnvVarError {
                        var: var_name.to_string(),
                    }
                    .into());
                }
            }
        }

        Ok(result)
    }

    /// 按格式反序列化内容
    fn parse<T: DeserializeOwned>(&self, content: &str, format: ConfigFormat) -> Result<T> {
        let processed = self.substitute_env_vars(content)?;

        let parsed = match format {
            ConfigFormat::Json => serde_json::from_str(&processed)
                .map_err(|e| ConfigError::ParseError(format!("JSON解析失败: {e}")))?,
            ConfigFormat::Toml => toml::from_str(&processed)
                .map_err(|e| ConfigError::ParseError(format!("TOML解析失败: {e}")))?,
        };

        Ok(parsed)
    }

    /// 读取文件内容，文件不存在时返回 `FileNotFound`
    async fn read_file(path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            }
            .into());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::ParseError(format!("读取文件失败: {e}")))?;

        Ok(content)
    }

    /// 加载配置，任何失败都退回默认配置并打印警告
    ///
    /// # 参数
    /// * `path` - 可选的配置文件路径
    ///
    /// # 返回
    /// * `Config` - 加载的配置或默认配置
    pub async fn load_or_default(&self, path: Option<&Path>) -> Config {
        let Some(path) = path else {
            debug!("未指定配置文件，使用默认配置");
            return Config::default();
        };

        match self.load_from_file(path).await {
            Ok(config) => config,
            Err(e) => {
                warn!("配置文件 {} 加载失败，使用默认配置: {}", path.display(), e);
                Config::default()
            }
        }
    }

    /// 从文件加载检测目标列表
    ///
    /// JSON文件为目标对象数组；TOML文件使用 `[[targets]]` 表数组。
    /// 文件缺失、格式错误或列表为空都会返回错误。
    pub async fn load_targets<P: AsRef<Path> + Send>(&self, path: P) -> Result<Vec<TargetSpec>> {
        let path = path.as_ref();
        let content = Self::read_file(path).await?;
        let format = ConfigFormat::from_path(path);

        let targets = self.parse_targets(&content, format)?;

        info!("从 {} 加载了 {} 个检测目标", path.display(), targets.len());
        Ok(targets)
    }

    /// 从字符串解析检测目标列表
    pub fn parse_targets(&self, content: &str, format: ConfigFormat) -> Result<Vec<TargetSpec>> {
        let targets: Vec<TargetSpec> = match format {
            ConfigFormat::Json => self.parse(content, format)?,
            ConfigFormat::Toml => self.parse::<TargetFile>(content, format)?.targets,
        };

        validate_targets(&targets).map_err(ConfigError::ValidationError)?;
        Ok(targets)
    }
}

/// TOML目标文件的顶层结构
#[derive(Debug, Deserialize)]
struct TargetFile {
    targets: Vec<TargetSpec>,
}

/// 检测目标列表验证
fn validate_targets(targets: &[TargetSpec]) -> std::result::Result<(), String> {
    if targets.is_empty() {
        return Err("检测目标列表为空".to_string());
    }

    for (index, target) in targets.iter().enumerate() {
        if target.url.trim().is_empty() {
            return Err(format!("第 {} 个检测目标的URL为空", index + 1));
        }
        if target.method.trim().is_empty() {
            return Err(format!("检测目标 {} 的HTTP方法为空", target.display_name()));
        }
    }

    Ok(())
}

#[async_trait]
impl ConfigLoader for FileConfigLoader {
    async fn load_from_file<P: AsRef<Path> + Send>(&self, path: P) -> Result<Config> {
        let path = path.as_ref();
        let content = Self::read_file(path).await?;

        let config = self
            .load_from_string(&content, ConfigFormat::from_path(path))
            .await?;

        info!("成功加载配置文件: {}", path.display());
        Ok(config)
    }

    async fn load_from_string(&self, content: &str, format: ConfigFormat) -> Result<Config> {
        let config: Config = self.parse(content, format)?;

        self.validate(&config)?;

        debug!("配置内容: {:?}", config);
        Ok(config)
    }

    fn validate(&self, config: &Config) -> Result<()> {
        validate_config(config).map_err(|e| ConfigError::ValidationError(e).into())
    }
}

/// 获取默认配置文件路径
///
/// 先检测当前目录的 `app-vitals.json`，再检测用户配置目录下的
/// `app-vitals/config.json`，都不存在时返回 `None`。
pub fn get_default_config_path() -> Option<PathBuf> {
    let local = PathBuf::from("app-vitals.json");
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|config_dir| config_dir.join(crate::APP_NAME).join("config.json"))
        .filter(|path| path.exists())
}
