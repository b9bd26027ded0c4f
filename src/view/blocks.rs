use std::fmt::Write;

use super::escape;
use crate::model::ContentBlock;

/// 按内容块的类型渲染对应的组件
pub fn render_block(block: &ContentBlock) -> String {
    match block {
        ContentBlock::Text { content, .. } => render_text(content),
        ContentBlock::Code { language, code, .. } => render_code(language, code),
        ContentBlock::Image {
            url, alt, caption, ..
        } => render_image(url, alt, caption.as_deref()),
    }
}

pub fn render_text(content: &str) -> String {
    format!(
        r#"<div class="text-block"><p>{}</p></div>"#,
        escape(content)
    )
}

/// 带语言标签和行号的代码块
///
/// 语法高亮由前端根据 `language-*` class 完成。
pub fn render_code(language: &str, code: &str) -> String {
    let language = escape(language);
    let mut html = format!(
        r#"<div class="code-block"><div class="code-language">{language}</div><pre><code class="language-{language}">"#
    );

    for (number, line) in code.lines().enumerate() {
        let _ = write!(
            html,
            r#"<span class="line"><span class="line-number">{}</span>{}</span>"#,
            number + 1,
            escape(line)
        );
        html.push('\n');
    }

    html.push_str("</code></pre></div>");
    html
}

pub fn render_image(url: &str, alt: &str, caption: Option<&str>) -> String {
    let mut html = format!(
        r#"<figure class="image-block"><img src="{}" alt="{}">"#,
        escape(url),
        escape(alt)
    );
    if let Some(caption) = caption {
        let _ = write!(html, "<figcaption>{}</figcaption>", escape(caption));
    }
    html.push_str("</figure>");
    html
}
