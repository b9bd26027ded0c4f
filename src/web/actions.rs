use axum::{
    Router,
    extract::{Path, State},
    http::HeaderMap,
    response::{Html, Redirect},
    routing::{get, post},
};
use axum_extra::extract::Query;
use serde::Deserialize;

use super::redirect_back;
use crate::app::App;

/// 配置交互路由。
///
/// - `POST /sidebar/toggle`：展开/收起侧边栏
/// - `POST /theme/toggle`：切换暗色模式
/// - `GET /search?q=`：搜索框输入，返回下拉列表片段
/// - `GET /search/results`：当前的下拉列表片段
/// - `POST /search/clear`：清空搜索框
/// - `GET /search/select/{slug}`：选中搜索结果
pub fn setup_route() -> Router<App> {
    Router::new()
        .route("/sidebar/toggle", post(toggle_sidebar))
        .route("/theme/toggle", post(toggle_theme))
        .route("/search", get(search_input))
        .route("/search/results", get(search_results))
        .route("/search/clear", post(search_clear))
        .route("/search/select/{slug}", get(search_select))
}

async fn toggle_sidebar(State(app): State<App>, headers: HeaderMap) -> Redirect {
    app.store().toggle_sidebar();
    redirect_back(&headers)
}

async fn toggle_theme(State(app): State<App>, headers: HeaderMap) -> Redirect {
    app.store().toggle_dark_mode();
    redirect_back(&headers)
}

/// 搜索参数
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    q: String,
}

/// 输入经过防抖后才会真正搜索，这里返回的是提交时的下拉列表
async fn search_input(Query(params): Query<SearchParams>, State(app): State<App>) -> Html<String> {
    app.search().input(&params.q);
    Html(app.search().render_dropdown())
}

async fn search_results(State(app): State<App>) -> Html<String> {
    Html(app.search().render_dropdown())
}

async fn search_clear(State(app): State<App>, headers: HeaderMap) -> Redirect {
    app.search().clear();
    redirect_back(&headers)
}

async fn search_select(Path(slug): Path<String>, State(app): State<App>) -> Redirect {
    Redirect::to(&app.search().select(&slug))
}
