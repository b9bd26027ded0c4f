mod github;
mod markdown;

use std::future::Future;

pub use self::{github::GithubApiRenderer, markdown::MarkdownRenderer};

use crate::{
    config::MarkdownEngineKind,
    error::Result,
};

/// 把 Markdown 文本渲染为 HTML
pub trait Renderer: Send + Sync {
    fn render(&self, markdown: &str) -> impl Future<Output = Result<String>> + Send;
}

/// 按配置选择的渲染引擎
#[derive(Clone)]
pub enum MarkdownEngine {
    Local(MarkdownRenderer),
    Github(GithubApiRenderer),
}

impl MarkdownEngine {
    /// 根据配置创建渲染引擎，GitHub 引擎从环境变量读取 token
    pub fn from_kind(kind: MarkdownEngineKind) -> Result<Self> {
        Ok(match kind {
            MarkdownEngineKind::Local => Self::Local(MarkdownRenderer::default()),
            MarkdownEngineKind::Github => Self::Github(GithubApiRenderer::from_env()?),
        })
    }
}

impl Renderer for MarkdownEngine {
    async fn render(&self, markdown: &str) -> Result<String> {
        match self {
            MarkdownEngine::Local(r) => r.render(markdown).await,
            MarkdownEngine::Github(r) => r.render(markdown).await,
        }
    }
}
