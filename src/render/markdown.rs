use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd, html};

use super::Renderer;
use crate::{error::Result, view::blocks};

/// 本地 Markdown 渲染器
///
/// 带语言标记的代码块复用内容块的代码渲染，其余部分交给 pulldown-cmark。
#[derive(Clone)]
pub struct MarkdownRenderer {
    options: Options,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self {
            options: Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS,
        }
    }
}

impl MarkdownRenderer {
    pub fn to_html(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);

        // (语言, 代码)
        let mut fence: Option<(String, String)> = None;
        let mut events = Vec::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) if !info.is_empty() => {
                    let language = info.split_whitespace().next().unwrap_or_default();
                    fence = Some((language.to_string(), String::new()));
                }
                Event::Text(text) if fence.is_some() => {
                    if let Some((_, code)) = fence.as_mut() {
                        code.push_str(&text);
                    }
                }
                Event::End(TagEnd::CodeBlock) if fence.is_some() => {
                    if let Some((language, code)) = fence.take() {
                        let rendered = blocks::render_code(&language, code.trim_end_matches('\n'));
                        events.push(Event::Html(rendered.into()));
                    }
                }
                // 正文中的原始 HTML 按文本输出
                Event::Html(raw) | Event::InlineHtml(raw) => events.push(Event::Text(raw)),
                other => events.push(other),
            }
        }

        let mut output = String::new();
        html::push_html(&mut output, events.into_iter());
        output
    }
}

impl Renderer for MarkdownRenderer {
    async fn render(&self, markdown: &str) -> Result<String> {
        Ok(self.to_html(markdown))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_code_uses_code_block() {
        let html = MarkdownRenderer::default().to_html(
            "# Binary Search\n\n```java\nint mid = (lo + hi) >>> 1;\nreturn mid;\n```\n",
        );

        assert!(html.contains("<h1>Binary Search</h1>"));
        assert!(html.contains(r#"class="code-block""#));
        assert!(html.contains("language-java"));
        assert!(html.contains("&gt;&gt;&gt;"), "代码需要转义: {html}");
        assert_eq!(html.matches(r#"class="line-number""#).count(), 2);
    }

    #[test]
    fn test_fence_without_language_is_plain() {
        let html = MarkdownRenderer::default().to_html("```\nplain\n```\n");

        assert!(!html.contains("code-block"));
        assert!(html.contains("<pre><code>plain"));
    }

    #[test]
    fn test_gfm_extensions() {
        let html = MarkdownRenderer::default()
            .to_html("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~\n\n- [x] done\n");

        assert!(html.contains("<table>"));
        assert!(html.contains("<del>gone</del>"));
        assert!(html.contains(r#"type="checkbox""#));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = MarkdownRenderer::default()
            .to_html("hi <script>alert(1)</script>\n\n<img src=x onerror=alert(2)>\n");

        assert!(!html.contains("<script>"), "{html}");
        assert!(!html.contains("<img"), "{html}");
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("&lt;img src=x onerror=alert(2)&gt;"));
    }

    #[tokio::test]
    async fn test_render_trait() {
        let html = MarkdownRenderer::default().render("*hi*").await.unwrap();
        assert_eq!(html.trim(), "<p><em>hi</em></p>");
    }
}
