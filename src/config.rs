use std::{env, path::Path, time::Duration};

use serde::Deserialize;

use crate::error::Result;

/// 后端请求超时时间
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// 应用配置
///
/// 优先读取 `ALGOWIKI_CONFIG` 指向的 TOML 文件，再用环境变量覆盖：
///
/// - `ALGOWIKI_API_URL`：后端 API 地址
/// - `ALGOWIKI_LISTEN`：前端服务监听地址
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 后端 API 基础地址
    pub api_url: String,
    /// 前端服务监听地址
    pub listen: String,
    /// 搜索输入的防抖时间（毫秒）
    pub search_delay_ms: u64,
    /// Markdown 渲染引擎
    pub markdown: MarkdownEngineKind,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkdownEngineKind {
    /// 本地 pulldown-cmark 渲染
    #[default]
    Local,
    /// GitHub Markdown API 渲染
    Github,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080/api".to_string(),
            listen: "0.0.0.0:3000".to_string(),
            search_delay_ms: 300,
            markdown: MarkdownEngineKind::default(),
        }
    }
}

impl Config {
    /// 从环境变量（以及可选的配置文件）加载配置
    pub fn from_env() -> Result<Self> {
        let mut config = match env::var("ALGOWIKI_CONFIG") {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };

        if let Ok(url) = env::var("ALGOWIKI_API_URL") {
            config.api_url = url;
        }
        if let Ok(listen) = env::var("ALGOWIKI_LISTEN") {
            config.listen = listen;
        }

        Ok(config)
    }

    /// 从 TOML 文件读取配置，缺失的字段使用默认值
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn search_delay(&self) -> Duration {
        Duration::from_millis(self.search_delay_ms)
    }
}
