use std::future::Future;

use reqwest::{
    RequestBuilder, Response, Url,
    header::{self, HeaderMap, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    config::REQUEST_TIMEOUT,
    error::{ApiError, Error, Result},
    model::{CreateTopicRequest, ErrorResponse, Tag, Topic},
};

/// 视图状态所依赖的后端操作
///
/// [`ApiClient`] 是基于 HTTP 的实现，测试中可以替换为内存实现。
pub trait Backend: Send + Sync + 'static {
    /// 获取主题树（根节点，带有嵌套的 `children`）
    fn topic_tree(&self) -> impl Future<Output = Result<Vec<Topic>>> + Send;

    /// 根据 slug 获取单个主题
    fn topic_by_slug(&self, slug: &str) -> impl Future<Output = Result<Topic>> + Send;

    /// 关键字搜索
    fn search_topics(&self, keyword: &str) -> impl Future<Output = Result<Vec<Topic>>> + Send;

    /// 获取全部标签
    fn all_tags(&self) -> impl Future<Output = Result<Vec<Tag>>> + Send;
}

/// 后端 HTTP API 客户端
///
/// 每个方法只发送一次请求，不重试、不缓存。所有响应都经过 [`check_response`]：
/// 错误会被记录日志，然后原样返回给调用者。
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
}

#[derive(Serialize)]
struct SearchParams<'a> {
    keyword: &'a str,
}

#[derive(Serialize)]
struct CreateTagParams<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<&'a str>,
}

impl ApiClient {
    /// 使用后端基础地址创建客户端，例如 `http://localhost:8080/api`
    ///
    /// ```ignore
    /// let client = ApiClient::new("http://localhost:8080/api")?;
    /// let tree = client.topic_tree().await?;
    /// ```
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let base_url =
            Url::parse(base_url.as_ref()).map_err(|_| Error::Custom("invalid api url"))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Custom("api url cannot be a base"));
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .default_headers({
                let mut header = HeaderMap::new();
                header.insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                );
                header
            })
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// 在基础地址之后追加路径段，每段都会被转义
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let resp = check_response(request.send().await).await?;
        Ok(resp.json().await?)
    }

    async fn execute(&self, request: RequestBuilder) -> Result<()> {
        check_response(request.send().await).await?;
        Ok(())
    }

    // 主题

    pub async fn topic_tree(&self) -> Result<Vec<Topic>> {
        self.fetch(self.client.get(self.endpoint(&["topics", "tree"])))
            .await
    }

    pub async fn all_topics(&self) -> Result<Vec<Topic>> {
        self.fetch(self.client.get(self.endpoint(&["topics"]))).await
    }

    pub async fn topic_by_id(&self, id: i64) -> Result<Topic> {
        self.fetch(self.client.get(self.endpoint(&["topics", &id.to_string()])))
            .await
    }

    pub async fn topic_by_slug(&self, slug: &str) -> Result<Topic> {
        self.fetch(self.client.get(self.endpoint(&["topics", "slug", slug])))
            .await
    }

    pub async fn search_topics(&self, keyword: &str) -> Result<Vec<Topic>> {
        self.fetch(
            self.client
                .get(self.endpoint(&["topics", "search"]))
                .query(&SearchParams { keyword }),
        )
        .await
    }

    pub async fn topics_by_tag(&self, tag_name: &str) -> Result<Vec<Topic>> {
        self.fetch(self.client.get(self.endpoint(&["topics", "tag", tag_name])))
            .await
    }

    pub async fn create_topic(&self, request: &CreateTopicRequest) -> Result<Topic> {
        self.fetch(self.client.post(self.endpoint(&["topics"])).json(request))
            .await
    }

    /// 整体替换指定 id 的主题
    pub async fn update_topic(&self, id: i64, request: &CreateTopicRequest) -> Result<Topic> {
        self.fetch(
            self.client
                .put(self.endpoint(&["topics", &id.to_string()]))
                .json(request),
        )
        .await
    }

    pub async fn delete_topic(&self, id: i64) -> Result<()> {
        self.execute(self.client.delete(self.endpoint(&["topics", &id.to_string()])))
            .await
    }

    // 标签

    pub async fn all_tags(&self) -> Result<Vec<Tag>> {
        self.fetch(self.client.get(self.endpoint(&["tags"]))).await
    }

    pub async fn tag_by_id(&self, id: i64) -> Result<Tag> {
        self.fetch(self.client.get(self.endpoint(&["tags", &id.to_string()])))
            .await
    }

    /// 创建标签，参数通过查询字符串传递，请求体为空
    pub async fn create_tag(&self, name: &str, color: Option<&str>) -> Result<Tag> {
        self.fetch(
            self.client
                .post(self.endpoint(&["tags"]))
                .query(&CreateTagParams { name, color }),
        )
        .await
    }

    pub async fn delete_tag(&self, id: i64) -> Result<()> {
        self.execute(self.client.delete(self.endpoint(&["tags", &id.to_string()])))
            .await
    }
}

impl Backend for ApiClient {
    async fn topic_tree(&self) -> Result<Vec<Topic>> {
        ApiClient::topic_tree(self).await
    }

    async fn topic_by_slug(&self, slug: &str) -> Result<Topic> {
        ApiClient::topic_by_slug(self, slug).await
    }

    async fn search_topics(&self, keyword: &str) -> Result<Vec<Topic>> {
        ApiClient::search_topics(self, keyword).await
    }

    async fn all_tags(&self) -> Result<Vec<Tag>> {
        ApiClient::all_tags(self).await
    }
}

/// 统一的响应检查
///
/// - 没有收到响应：记录网络错误
/// - 后端返回错误状态码：记录后端的错误响应体
///
/// 两种情况都会把错误返回给调用者。
async fn check_response(result: reqwest::Result<Response>) -> Result<Response> {
    let resp = match result {
        Ok(resp) => resp,
        Err(e) => {
            tracing::error!(error = %e, "network error");
            return Err(e.into());
        }
    };

    let status = resp.status();
    if !status.is_client_error() && !status.is_server_error() {
        return Ok(resp);
    }

    let path = resp.url().path().to_string();
    let payload = match resp.text().await {
        Ok(body) => serde_json::from_str::<ErrorResponse>(&body).ok(),
        Err(_) => None,
    };

    match &payload {
        Some(p) => tracing::error!(%status, %path, message = %p.message, "api error"),
        None => tracing::error!(%status, %path, "api error"),
    }

    Err(ApiError { status, payload }.into())
}
