use std::{
    fmt::Write,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use super::{escape, path, tag_badge};
use crate::{
    client::Backend,
    debounce::Debouncer,
    model::Topic,
    store::{SearchOutcome, Store},
};

/// 搜索框的局部状态
#[derive(Debug, Default, Clone)]
pub struct SearchView {
    pub term: String,
    pub results: Vec<Topic>,
    pub is_searching: bool,
}

/// 带防抖的搜索框
///
/// 输入经过防抖后调用 [`Store::search_topics`]，搜索结果只保存在搜索框自己的下拉列表中。
pub struct SearchBar {
    view: Arc<Mutex<SearchView>>,
    debouncer: Debouncer<String>,
}

impl SearchBar {
    /// 默认防抖时间
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(300);

    pub fn new<B: Backend>(store: Arc<Store<B>>, delay: Duration) -> Self {
        let view = Arc::new(Mutex::new(SearchView::default()));

        let debouncer = Debouncer::new(delay, {
            let view = view.clone();
            move |keyword: String| search(store.clone(), view.clone(), keyword)
        });

        Self { view, debouncer }
    }

    fn lock(&self) -> MutexGuard<'_, SearchView> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 输入框内容变化
    pub fn input(&self, value: &str) {
        self.lock().term = value.to_string();
        self.debouncer.submit(value.to_string());
    }

    /// 选中某个结果，清空输入并返回跳转路径
    pub fn select(&self, slug: &str) -> String {
        self.clear();
        path("/topic", slug)
    }

    pub fn clear(&self) {
        let mut view = self.lock();
        view.term.clear();
        view.results.clear();
    }

    pub fn view(&self) -> SearchView {
        self.lock().clone()
    }

    /// 渲染输入框和下拉列表
    pub fn render(&self) -> String {
        let view = self.lock();
        let mut html = format!(
            r#"<div class="search-bar"><form action="/search" method="get"><input type="text" name="q" placeholder="Search topics..." value="{}" autocomplete="off"></form>"#,
            escape(&view.term)
        );
        if !view.term.is_empty() {
            html.push_str(r#"<form action="/search/clear" method="post"><button class="search-clear" type="submit">&#215;</button></form>"#);
            html.push_str(&render_dropdown(&view));
        }
        html.push_str("</div>");
        html
    }

    /// 只渲染下拉列表，输入为空时返回空字符串
    pub fn render_dropdown(&self) -> String {
        let view = self.lock();
        if view.term.is_empty() {
            return String::new();
        }
        render_dropdown(&view)
    }
}

async fn search<B: Backend>(store: Arc<Store<B>>, view: Arc<Mutex<SearchView>>, keyword: String) {
    let lock = || view.lock().unwrap_or_else(PoisonError::into_inner);

    if keyword.trim().is_empty() {
        let mut state = lock();
        state.results.clear();
        state.is_searching = false;
        return;
    }

    lock().is_searching = true;
    let topics = match store.search_topics(&keyword).await {
        SearchOutcome::Applied => store.with_state(|s| s.topics.clone()),
        // 失败时 `topics` 不是本次的结果
        SearchOutcome::Failed | SearchOutcome::Cleared => Vec::new(),
        // 更新的搜索会写入结果
        SearchOutcome::Stale => return,
    };

    let mut state = lock();
    state.is_searching = false;
    // 结果返回前输入已经变化，丢弃
    if state.term == keyword {
        state.results = topics;
    }
}

fn render_dropdown(view: &SearchView) -> String {
    let mut html = String::from(r#"<div class="search-results">"#);

    if view.is_searching {
        html.push_str(r#"<div class="search-status">Searching...</div>"#);
    } else if view.results.is_empty() {
        html.push_str(r#"<div class="search-status">No results found</div>"#);
    } else {
        html.push_str("<ul>");
        for topic in &view.results {
            let _ = write!(
                html,
                r#"<li><a href="{}"><div class="search-title">{}</div>"#,
                path("/search/select", &topic.slug),
                escape(&topic.title)
            );
            if !topic.tags.is_empty() {
                html.push_str(r#"<div class="search-tags">"#);
                for tag in &topic.tags {
                    html.push_str(&tag_badge(tag));
                }
                html.push_str("</div>");
            }
            html.push_str("</a></li>");
        }
        html.push_str("</ul>");
    }

    html.push_str("</div>");
    html
}
