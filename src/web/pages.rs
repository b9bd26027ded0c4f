use axum::{
    Router,
    extract::{Path, State},
    response::{Html, Redirect},
    routing::get,
};

use crate::{
    app::App,
    error::Result,
    render::Renderer,
    store::AppState,
    view::{
        self,
        pages::{self as page, Layout},
        tree::TopicTree,
    },
};

/// 配置页面路由。
///
/// - `GET /`：首页
/// - `GET /topic/{slug}`：主题详情
/// - `GET /nav/{slug}`：点击侧边栏节点
pub fn setup_route() -> Router<App> {
    Router::new()
        .route("/", get(home))
        .route("/topic/{slug}", get(topic))
        .route("/nav/{slug}", get(nav))
}

/// 侧边栏为空时加载主题树
async fn ensure_topic_tree(app: &App) {
    if app.store().with_state(|s| s.topics.is_empty()) {
        app.store().fetch_topic_tree().await;
    }
}

/// 把主内容放进完整的页面骨架
fn render_page(app: &App, state: &AppState, title: &str, active: Option<&str>, main: &str) -> String {
    let tree = TopicTree::from_topics(&state.topics);
    let tree = app.sidebar().render(&tree, active);
    let sidebar = page::sidebar(state, &tree);
    let header = page::header(state, &app.search().render());
    let root_class = app.root_classes().to_attr();

    Layout {
        title,
        root_class: &root_class,
        sidebar: &sidebar,
        header: &header,
        main,
    }
    .render()
}

async fn home(State(app): State<App>) -> Html<String> {
    ensure_topic_tree(&app).await;
    app.store().fetch_tags().await;

    let state = app.store().snapshot();
    Html(render_page(&app, &state, "AlgoWiki", None, &page::home(&state)))
}

async fn topic(Path(slug): Path<String>, State(app): State<App>) -> Result<Html<String>> {
    ensure_topic_tree(&app).await;
    app.store().fetch_topic_by_slug(&slug).await;

    let state = app.store().snapshot();
    let content = match &state.current_topic {
        Some(topic) if state.error.is_none() && !topic.content.trim().is_empty() => {
            Some(app.renderer().render(&topic.content).await?)
        }
        _ => None,
    };

    let title = state
        .current_topic
        .as_ref()
        .map(|t| t.title.as_str())
        .unwrap_or("AlgoWiki");
    let main = page::topic(&state, content.as_deref());

    Ok(Html(render_page(&app, &state, title, Some(&slug), &main)))
}

/// 有子节点时切换展开状态，然后跳转到主题详情
async fn nav(Path(slug): Path<String>, State(app): State<App>) -> Redirect {
    let tree = app.store().with_state(|s| TopicTree::from_topics(&s.topics));

    let target = match tree.find_by_slug(&slug) {
        Some(id) => app.sidebar().click(&tree, id),
        None => view::path("/topic", &slug),
    };

    Redirect::to(&target)
}
