mod actions;
mod pages;

use axum::{
    Router,
    http::{HeaderMap, header},
    response::Redirect,
};
use reqwest::Url;
use tower_http::trace::TraceLayer;
use tracing::instrument;

use crate::app::App;

/// 设置前端的路由并绑定应用状态。
///
/// 未匹配的路径都会被重定向到首页。
pub fn setup_route(app: App) -> Router {
    Router::new()
        .merge(pages::setup_route())
        .merge(actions::setup_route())
        .fallback(|| async { Redirect::to("/") })
        .with_state(app)
}

/// 在给定地址上启动 HTTP 服务。
#[instrument(name = "http server", skip_all)]
pub async fn run_server_with_router(router: Router, listen: &str) {
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind TCP listener on {listen}: {e}"));

    tracing::info!("listening on {listen}");

    axum::serve(listener, router)
        .await
        .expect("Failed to start Axum server");
}

/// 启动 HTTP 服务，自动设置路由和中间件。
///
/// 1. 生成路由
/// 2. 添加日志和追踪中间件
/// 3. 启动服务器
pub async fn run_server(app: App, listen: &str) {
    let router = setup_route(app);
    let router = add_middlewares(router);
    run_server_with_router(router, listen).await
}

/// 为路由添加中间件，在请求失败时输出错误信息。
fn add_middlewares(router: Router) -> Router {
    fn log_failure(
        err: tower_http::classify::ServerErrorsFailureClass,
        _latency: std::time::Duration,
        _span: &tracing::Span,
    ) {
        tracing::error!(error = %err, "request failed");
    }

    router.layer(
        TraceLayer::new_for_http()
            .on_failure(log_failure)
            .on_request(|_req: &_, _span: &tracing::Span| {
                // 空实现，关闭请求日志
            }),
    )
}

/// 重定向回来源页面，没有 Referer 时回到首页
fn redirect_back(headers: &HeaderMap) -> Redirect {
    let back = headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Url::parse(v).ok())
        .map(|url| match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        })
        .unwrap_or_else(|| "/".to_string());

    Redirect::to(&back)
}
