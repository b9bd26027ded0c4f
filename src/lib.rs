pub mod app;
pub mod client;
pub mod config;
pub mod debounce;
pub mod error;
pub mod model;
pub mod render;
pub mod store;
pub mod view;
pub mod web;

use tracing_subscriber::{EnvFilter, fmt::time::ChronoLocal};

use app::App;
use config::Config;

/// 初始化日志，过滤规则从环境变量 `ALGOWIKI_LOG` 读取
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S%.3f".to_string()))
        .with_env_filter(EnvFilter::from_env("ALGOWIKI_LOG"))
        .init();
}

pub async fn run() {
    init_tracing();

    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(api_url = %config.api_url, markdown = ?config.markdown, "starting algowiki");

    let app = App::new(&config).expect("Failed to initialize application");

    web::run_server(app, &config.listen).await
}
