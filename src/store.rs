use std::{
    collections::BTreeSet,
    sync::{
        Arc, PoisonError, RwLock,
        atomic::{AtomicU64, Ordering},
    },
};

use tokio::sync::watch;

use crate::{
    client::Backend,
    model::{Tag, Topic},
};

/// 展示给用户的固定错误信息
pub mod messages {
    pub const LOAD_TOPICS_FAILED: &str = "Failed to load topics. Please try again later.";
    pub const TOPIC_NOT_FOUND: &str = "Topic not found.";
    pub const SEARCH_FAILED: &str = "Search failed. Please try again.";
}

/// 全局视图状态
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    /// 根主题或搜索结果，取决于最近一次操作
    pub topics: Vec<Topic>,
    pub current_topic: Option<Topic>,
    pub tags: Vec<Tag>,
    /// 仅在请求进行中为 true
    pub is_loading: bool,
    /// 每次新操作开始时清空
    pub error: Option<String>,
    pub sidebar_open: bool,
    pub dark_mode: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            topics: Vec::new(),
            current_topic: None,
            tags: Vec::new(),
            is_loading: false,
            error: None,
            sidebar_open: true,
            dark_mode: false,
        }
    }
}

/// 状态容器之外的全局样式作用域，暗色模式切换时会修改它
pub trait StyleScope: Send + Sync {
    fn set_dark(&self, dark: bool);
}

/// 文档根节点的 class 列表
///
/// 页面布局从这里读取根节点的 class，而不是直接读取 [`AppState::dark_mode`]。
#[derive(Debug, Default)]
pub struct RootClassList {
    classes: RwLock<BTreeSet<String>>,
}

impl RootClassList {
    pub const DARK: &'static str = "dark";

    pub fn contains(&self, class: &str) -> bool {
        self.classes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(class)
    }

    /// 以空格分隔的 class 属性值
    pub fn to_attr(&self) -> String {
        let classes = self.classes.read().unwrap_or_else(PoisonError::into_inner);
        classes.iter().map(String::as_str).collect::<Vec<_>>().join(" ")
    }
}

impl StyleScope for RootClassList {
    fn set_dark(&self, dark: bool) {
        let mut classes = self.classes.write().unwrap_or_else(PoisonError::into_inner);
        if dark {
            classes.insert(Self::DARK.to_string());
        } else {
            classes.remove(Self::DARK);
        }
    }
}

/// 一次搜索对 `topics` 的影响
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// 结果已写入 `topics`
    Applied,
    /// 关键字为空，`topics` 被清空
    Cleared,
    /// 请求失败，`topics` 保持不变
    Failed,
    /// 已有更新的搜索，响应被丢弃
    Stale,
}

/// 视图状态容器
///
/// 所有修改都通过具名的操作完成，每次状态转换都是一次完整的 `send_modify`，
/// 读取方不会看到中间状态。网络操作的失败会被记录日志并转换为 [`messages`] 中的固定文案，
/// 不会返回给调用者。
///
/// 并发的搜索通过递增的序号排序：只有最新一次搜索的结果会被写入状态，过期的响应直接丢弃。
pub struct Store<B> {
    backend: B,
    state: watch::Sender<AppState>,
    style: Arc<dyn StyleScope>,
    search_seq: AtomicU64,
}

impl<B: Backend> Store<B> {
    pub fn new(backend: B, style: Arc<dyn StyleScope>) -> Self {
        Self {
            backend,
            state: watch::Sender::new(AppState::default()),
            style,
            search_seq: AtomicU64::new(0),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// 当前状态的快照
    pub fn snapshot(&self) -> AppState {
        self.state.borrow().clone()
    }

    /// 在不克隆整个状态的情况下读取其中一部分
    pub fn with_state<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.state.borrow())
    }

    /// 订阅整个状态
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.state.subscribe()
    }

    /// 订阅状态的一部分，只有投影出来的值变化时才会被唤醒
    pub fn select<T, F>(&self, project: F) -> Slice<T, F>
    where
        T: PartialEq + Clone,
        F: Fn(&AppState) -> T,
    {
        let mut rx = self.state.subscribe();
        let last = project(&rx.borrow_and_update());
        Slice { rx, project, last }
    }

    fn begin(&self) {
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });
    }

    fn fail(&self, message: &str) {
        self.state.send_modify(|s| {
            s.error = Some(message.to_string());
            s.is_loading = false;
        });
    }

    /// 获取侧边栏的主题树
    pub async fn fetch_topic_tree(&self) {
        self.begin();
        match self.backend.topic_tree().await {
            Ok(topics) => self.state.send_modify(|s| {
                s.topics = topics;
                s.is_loading = false;
            }),
            Err(e) => {
                tracing::error!(error = %e, "error fetching topic tree");
                self.fail(messages::LOAD_TOPICS_FAILED);
            }
        }
    }

    /// 根据 slug 获取当前主题
    pub async fn fetch_topic_by_slug(&self, slug: &str) {
        self.begin();
        match self.backend.topic_by_slug(slug).await {
            Ok(topic) => self.state.send_modify(|s| {
                s.current_topic = Some(topic);
                s.is_loading = false;
            }),
            Err(e) => {
                tracing::error!(error = %e, %slug, "error fetching topic");
                self.state.send_modify(|s| {
                    s.error = Some(messages::TOPIC_NOT_FOUND.to_string());
                    s.current_topic = None;
                    s.is_loading = false;
                });
            }
        }
    }

    /// 搜索主题，结果替换 `topics`
    ///
    /// 关键字为空或只有空白时直接清空 `topics`，不发送请求。
    pub async fn search_topics(&self, keyword: &str) -> SearchOutcome {
        let token = self.search_seq.fetch_add(1, Ordering::SeqCst) + 1;

        if keyword.trim().is_empty() {
            self.state.send_modify(|s| {
                s.topics.clear();
                s.is_loading = false;
            });
            return SearchOutcome::Cleared;
        }

        self.begin();
        let result = self.backend.search_topics(keyword).await;

        if self.search_seq.load(Ordering::SeqCst) != token {
            tracing::debug!(%keyword, "discarding stale search response");
            return SearchOutcome::Stale;
        }

        match result {
            Ok(topics) => {
                self.state.send_modify(|s| {
                    s.topics = topics;
                    s.is_loading = false;
                });
                SearchOutcome::Applied
            }
            Err(e) => {
                tracing::error!(error = %e, %keyword, "error searching topics");
                self.fail(messages::SEARCH_FAILED);
                SearchOutcome::Failed
            }
        }
    }

    /// 获取全部标签，失败时只记录日志
    pub async fn fetch_tags(&self) {
        match self.backend.all_tags().await {
            Ok(tags) => self.state.send_modify(|s| s.tags = tags),
            Err(e) => tracing::error!(error = %e, "error fetching tags"),
        }
    }

    pub fn set_current_topic(&self, topic: Option<Topic>) {
        self.state.send_modify(|s| s.current_topic = topic);
    }

    pub fn toggle_sidebar(&self) {
        self.state.send_modify(|s| s.sidebar_open = !s.sidebar_open);
    }

    /// 切换暗色模式，同时修改文档根节点的 class
    pub fn toggle_dark_mode(&self) {
        self.state.send_modify(|s| {
            s.dark_mode = !s.dark_mode;
            self.style.set_dark(s.dark_mode);
        });
    }

    pub fn set_error(&self, error: Option<String>) {
        self.state.send_modify(|s| s.error = error);
    }
}

/// 状态的一个切片订阅，见 [`Store::select`]
pub struct Slice<T, F> {
    rx: watch::Receiver<AppState>,
    project: F,
    last: T,
}

impl<T, F> Slice<T, F>
where
    T: PartialEq + Clone,
    F: Fn(&AppState) -> T,
{
    pub fn get(&self) -> &T {
        &self.last
    }

    /// 等待切片的值发生变化，状态容器被丢弃时返回 `None`
    pub async fn changed(&mut self) -> Option<T> {
        loop {
            self.rx.changed().await.ok()?;
            let next = (self.project)(&self.rx.borrow_and_update());
            if next != self.last {
                self.last = next.clone();
                return Some(next);
            }
        }
    }
}
