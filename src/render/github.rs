use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::Serialize;

use super::Renderer;
use crate::error::{Error, Result};

/// GithubApiRenderer 使用 GitHub Markdown API 渲染 GitHub Flavored Markdown。
#[derive(Clone)]
pub struct GithubApiRenderer {
    client: reqwest::Client,
}

impl GithubApiRenderer {
    const TOKEN_ENV: &'static str = "GITHUB_MARKDOWN_RENDER_KEY";

    /// 从环境变量 `GITHUB_MARKDOWN_RENDER_KEY` 创建渲染器
    pub fn from_env() -> Result<Self> {
        let token = std::env::var(Self::TOKEN_ENV)
            .map_err(|_| Error::Custom("GITHUB_MARKDOWN_RENDER_KEY not set"))?;
        Self::new(token)
    }

    /// 使用指定的 GitHub Token 创建渲染器
    pub fn new<T: AsRef<str>>(token: T) -> Result<Self> {
        let authorization = HeaderValue::from_str(&format!("Bearer {}", token.as_ref()))
            .map_err(|_| Error::Custom("invalid github token"))?;

        let client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .default_headers({
                let mut header = HeaderMap::new();
                header.insert(
                    header::ACCEPT,
                    HeaderValue::from_static("application/vnd.github+json"),
                );
                header.insert(
                    "X-GitHub-Api-Version",
                    HeaderValue::from_static("2022-11-28"),
                );
                header.insert(header::AUTHORIZATION, authorization);
                header
            })
            .timeout(crate::config::REQUEST_TIMEOUT)
            .build()?;

        Ok(Self { client })
    }
}

#[derive(Serialize)]
struct RequestBody<'a> {
    text: &'a str,
    mode: &'a str,
}

impl Renderer for GithubApiRenderer {
    async fn render(&self, markdown: &str) -> Result<String> {
        const GITHUB_MARKDOWN_RENDER_API: &str = "https://api.github.com/markdown";

        let resp = self
            .client
            .post(GITHUB_MARKDOWN_RENDER_API)
            .json(&RequestBody {
                text: markdown,
                mode: "gfm",
            })
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_token_with_newline() {
        assert!(GithubApiRenderer::new("abc\ndef").is_err());
    }

    /// 访问 GitHub API 的测试，需要网络和有效 token
    #[tokio::test]
    #[ignore = "需要访问 github api"]
    async fn test_render() {
        let render = GithubApiRenderer::from_env().expect("GITHUB_MARKDOWN_RENDER_KEY not set");
        let html = render.render("# Title").await.expect("渲染失败");
        assert!(html.contains("<h1"));
    }
}
