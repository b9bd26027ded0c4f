use std::fmt::Write;

use super::{escape, tag_badge};
use crate::store::AppState;

/// 首页的功能卡片：(标题, 描述, slug)
const FEATURES: [(&str, &str, &str); 3] = [
    (
        "Data Structures & Algorithms",
        "Master fundamental data structures and algorithmic techniques.",
        "dsa",
    ),
    (
        "Object-Oriented Programming",
        "Learn OOP principles and design patterns.",
        "oop",
    ),
    (
        "Database Management",
        "Understand database design, SQL, and optimization.",
        "dbms",
    ),
];

/// 页面骨架：侧边栏、头部和主内容
pub struct Layout<'a> {
    pub title: &'a str,
    /// 文档根节点的 class 属性
    pub root_class: &'a str,
    pub sidebar: &'a str,
    pub header: &'a str,
    pub main: &'a str,
}

impl Layout<'_> {
    pub fn render(&self) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en" class="{}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{}</title>
</head>
<body>
<div class="layout">
{}
<div class="content">
{}
<main><div class="container">{}</div></main>
</div>
</div>
</body>
</html>
"#,
            escape(self.root_class),
            escape(self.title),
            self.sidebar,
            self.header,
            self.main,
        )
    }
}

/// 头部：侧边栏开关、搜索框、暗色模式开关
pub fn header(state: &AppState, search: &str) -> String {
    let (theme_label, theme_icon) = if state.dark_mode {
        ("Switch to light mode", "&#9728;")
    } else {
        ("Switch to dark mode", "&#9790;")
    };

    format!(
        r#"<header class="header"><form action="/sidebar/toggle" method="post"><button class="menu-button" type="submit" aria-label="Toggle sidebar">&#9776;</button></form><h1 class="logo">CS Knowledge Hub</h1><div class="search">{search}</div><div class="actions"><form action="/theme/toggle" method="post"><button type="submit" aria-label="{theme_label}">{theme_icon}</button></form><a href="https://github.com" target="_blank" rel="noopener noreferrer" aria-label="GitHub repository">GitHub</a></div></header>"#
    )
}

/// 侧边栏容器，加载中时显示提示而不是主题树
pub fn sidebar(state: &AppState, tree: &str) -> String {
    let class = if state.sidebar_open {
        "sidebar open"
    } else {
        "sidebar closed"
    };

    let mut html = String::new();
    if state.sidebar_open {
        html.push_str(r#"<form class="sidebar-overlay" action="/sidebar/toggle" method="post"><button type="submit" aria-label="Close sidebar"></button></form>"#);
    }
    let _ = write!(
        html,
        r#"<aside class="{class}"><div class="sidebar-header"><h2>AlgoWiki</h2><form action="/sidebar/toggle" method="post"><button type="submit" aria-label="Close sidebar">&#215;</button></form></div>"#
    );

    if state.is_loading {
        html.push_str(r#"<div class="sidebar-loading">Loading...</div>"#);
    } else {
        html.push_str(tree);
    }

    html.push_str("</aside>");
    html
}

pub fn home(state: &AppState) -> String {
    let mut html = String::from(
        r#"<section class="hero"><h1>Welcome to AlgoWiki</h1><p>Your comprehensive guide to Computer Science fundamentals. Master DSA, OOP, and DBMS concepts with clear explanations and examples.</p></section><section class="features">"#,
    );

    for (title, description, slug) in FEATURES {
        let _ = write!(
            html,
            r#"<a class="feature-card" href="/topic/{slug}"><h3>{}</h3><p>{}</p></a>"#,
            escape(title),
            escape(description)
        );
    }
    html.push_str("</section>");

    if !state.tags.is_empty() {
        html.push_str(r#"<section class="tags"><h2>Browse by tag</h2><div class="tag-list">"#);
        for tag in &state.tags {
            html.push_str(&tag_badge(tag));
        }
        html.push_str("</div></section>");
    }

    html.push_str(r#"<section class="cta"><h2>Ready to Start Learning?</h2><p>Navigate through topics using the sidebar or search for specific concepts.</p></section>"#);
    html
}

/// 主题详情页
///
/// `content` 为已经渲染好的正文 HTML。
pub fn topic(state: &AppState, content: Option<&str>) -> String {
    if state.is_loading {
        return r#"<div class="page-status"><div class="spinner"></div><p>Loading topic...</p></div>"#
            .to_string();
    }

    let topic = match (&state.error, &state.current_topic) {
        (None, Some(topic)) => topic,
        (error, _) => {
            return format!(
                r#"<div class="page-status"><p class="error">{}</p><p>Please try selecting a different topic from the sidebar.</p></div>"#,
                escape(error.as_deref().unwrap_or("Topic not found"))
            );
        }
    };

    let mut html = format!(
        r#"<article class="topic"><header class="topic-header"><h1>{}</h1><div class="topic-meta">"#,
        escape(&topic.title)
    );

    if let Some(updated_at) = topic.updated_at {
        let _ = write!(
            html,
            r#"<span class="updated">Updated: {}</span>"#,
            updated_at.format("%Y-%m-%d")
        );
    }

    if !topic.tags.is_empty() {
        html.push_str(r#"<div class="topic-tags">"#);
        for tag in &topic.tags {
            html.push_str(&tag_badge(tag));
        }
        html.push_str("</div>");
    }
    html.push_str("</div></header>");

    match content.filter(|c| !c.trim().is_empty()) {
        Some(content) => {
            let _ = write!(html, r#"<div class="prose markdown-content">{content}</div>"#);
        }
        None => html.push_str(r#"<div class="prose"><p class="empty">No content available for this topic yet.</p></div>"#),
    }

    html.push_str("</article>");
    html
}
