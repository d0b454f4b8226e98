//! 检测目标定义
//!
//! 描述一个需要检测的 HTTP(S) 端点

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// 单个检测目标
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TargetSpec {
    /// 目标URL
    pub url: String,
    /// 显示名称，缺省时使用URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// HTTP方法，原样透传
    #[serde(default = "default_method")]
    pub method: String,
    /// 请求头，`null` 视为空
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "HashMap::is_empty"
    )]
    pub headers: HashMap<String, String>,
    /// 请求体：字符串原样发送，其他JSON值以JSON形式发送
    #[serde(default, alias = "data", skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

fn default_method() -> String {
    "GET".to_string()
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<HashMap<String, String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl TargetSpec {
    /// 使用URL创建检测目标，其余字段取默认值
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: None,
            method: default_method(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// 设置显示名称
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// 设置HTTP方法
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// 添加请求头
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// 设置请求体
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// 显示名称
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.url)
    }
}

/// 内置的默认检测目标
pub fn default_targets() -> Vec<TargetSpec> {
    vec![
        TargetSpec::new("http://localhost:30007").with_name("WiseCow App"),
        TargetSpec::new("https://httpbin.org/status/200").with_name("HTTPBin Test"),
        TargetSpec::new("https://google.com").with_name("Google"),
    ]
}
