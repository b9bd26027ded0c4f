//! HTML 视图组件
//!
//! 组件都是从状态快照生成 HTML 字符串的函数，组件自己的局部状态
//! （侧边栏展开状态、搜索下拉框）由对应的结构体持有。

pub mod blocks;
pub mod pages;
pub mod search;
pub mod tree;

use crate::model::Tag;

/// 转义 HTML 文本和属性值
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// 拼接站内路径，`segment` 中 URL 不安全的字符会被百分号编码
pub fn path(prefix: &str, segment: &str) -> String {
    let mut path = format!("{prefix}/");
    for b in segment.bytes() {
        if b.is_ascii_alphanumeric() || b"-_.~".contains(&b) {
            path.push(b as char);
        } else {
            path.push_str(&format!("%{b:02X}"));
        }
    }
    path
}

/// 标签徽章，背景色为标签颜色加透明度
pub fn tag_badge(tag: &Tag) -> String {
    let color = escape(tag.color());
    format!(
        r#"<span class="tag-badge" style="background-color: {color}20; color: {color}">{}</span>"#,
        escape(&tag.name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_path_encodes_segment() {
        assert_eq!(path("/topic", "binary-search"), "/topic/binary-search");
        assert_eq!(path("/nav", "a b/c"), "/nav/a%20b%2Fc");
    }

    #[test]
    fn test_tag_badge() {
        let tag = Tag {
            id: 1,
            name: "graphs".into(),
            color: Some("#10b981".into()),
        };

        let html = tag_badge(&tag);
        assert!(html.contains("background-color: #10b98120"));
        assert!(html.contains(">graphs</span>"));
    }
}
