use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    client::ApiClient,
    config::Config,
    error::Result,
    render::MarkdownEngine,
    store::{RootClassList, Store},
    view::{search::SearchBar, tree::Sidebar},
};

/// 应用程序上下文
///
/// [`App`] 封装了视图状态、侧边栏和搜索框的局部状态、Markdown 渲染器以及文档根节点的 class 列表。
#[derive(Clone)]
pub struct App {
    store: Arc<Store<ApiClient>>,
    sidebar: Arc<Mutex<Sidebar>>,
    search: Arc<SearchBar>,
    renderer: MarkdownEngine,
    root: Arc<RootClassList>,
}

impl App {
    /// 根据配置创建一个新的 [`App`] 实例
    ///
    /// 必须在 tokio 运行时中调用。
    pub fn new(config: &Config) -> Result<App> {
        let client = ApiClient::new(&config.api_url)?;
        let renderer = MarkdownEngine::from_kind(config.markdown)?;
        Ok(Self::with_parts(client, renderer, config))
    }

    pub fn with_parts(client: ApiClient, renderer: MarkdownEngine, config: &Config) -> App {
        let root = Arc::new(RootClassList::default());
        let store = Arc::new(Store::new(client, root.clone()));
        let search = Arc::new(SearchBar::new(store.clone(), config.search_delay()));

        Self {
            store,
            sidebar: Arc::new(Mutex::new(Sidebar::default())),
            search,
            renderer,
            root,
        }
    }

    /// 获取视图状态
    pub fn store(&self) -> &Store<ApiClient> {
        &self.store
    }

    /// 获取侧边栏，锁不能跨越 `.await` 持有
    pub fn sidebar(&self) -> MutexGuard<'_, Sidebar> {
        self.sidebar.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 获取搜索框
    pub fn search(&self) -> &SearchBar {
        &self.search
    }

    /// 获取 Markdown 渲染器
    pub fn renderer(&self) -> &MarkdownEngine {
        &self.renderer
    }

    /// 获取文档根节点的 class 列表
    pub fn root_classes(&self) -> &RootClassList {
        &self.root
    }
}
