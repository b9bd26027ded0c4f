//! 内存中的后端 API，测试时绑定在随机端口上
#![allow(dead_code)]

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use algowiki::model::{CreateTopicRequest, ErrorResponse, Tag, Topic};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;

#[derive(Default)]
struct Data {
    topics: Vec<Topic>,
    tags: Vec<Tag>,
    next_id: i64,
}

#[derive(Clone, Default)]
pub struct FakeBackend {
    data: Arc<Mutex<Data>>,
}

type ApiResult<T> = std::result::Result<Json<T>, Response>;

fn not_found(path: String) -> Response {
    let body = ErrorResponse {
        status: 404,
        message: "Resource not found".to_string(),
        path,
        timestamp: "2024-01-01T00:00:00".to_string(),
        errors: None,
    };
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

impl FakeBackend {
    /// 启动服务，返回 API 基础地址
    pub async fn spawn(self) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("绑定端口失败");
        let addr: SocketAddr = listener.local_addr().expect("读取地址失败");

        let router = self.router();
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("服务启动失败");
        });

        format!("http://{addr}/api")
    }

    /// 预置一棵主题树
    ///
    /// dsa
    /// └── arrays
    /// oop
    pub fn seeded() -> Self {
        let backend = Self::default();
        let algo = backend.insert_tag("algo", Some("#3b82f6"));
        backend.insert_topic(
            "Data Structures",
            "dsa",
            "# Data Structures\n\nSee **arrays**.",
            None,
            vec![algo.clone()],
        );
        backend.insert_topic("Arrays", "arrays", "Contiguous memory.", Some(2), vec![algo]);
        backend.insert_topic("Object Oriented", "oop", "", None, Vec::new());
        backend
    }

    pub fn insert_tag(&self, name: &str, color: Option<&str>) -> Tag {
        let mut data = self.data.lock().unwrap();
        data.next_id += 1;
        let tag = Tag {
            id: data.next_id,
            name: name.to_string(),
            color: color.map(str::to_string),
        };
        data.tags.push(tag.clone());
        tag
    }

    pub fn insert_topic(
        &self,
        title: &str,
        slug: &str,
        content: &str,
        parent_id: Option<i64>,
        tags: Vec<Tag>,
    ) -> Topic {
        let mut data = self.data.lock().unwrap();
        data.next_id += 1;
        let topic = Topic {
            id: data.next_id,
            title: title.to_string(),
            slug: slug.to_string(),
            content: content.to_string(),
            parent_id,
            display_order: data.topics.len() as i32,
            children: Vec::new(),
            tags,
            created_at: None,
            updated_at: None,
        };
        data.topics.push(topic.clone());
        topic
    }

    fn router(self) -> Router {
        Router::new()
            .route("/api/topics", get(all_topics).post(create_topic))
            .route("/api/topics/tree", get(topic_tree))
            .route("/api/topics/search", get(search_topics))
            .route("/api/topics/slug/{slug}", get(topic_by_slug))
            .route("/api/topics/tag/{name}", get(topics_by_tag))
            .route(
                "/api/topics/{id}",
                get(topic_by_id).put(update_topic).delete(delete_topic),
            )
            .route("/api/tags", get(all_tags).post(create_tag))
            .route("/api/tags/{id}", get(tag_by_id).delete(delete_tag))
            .with_state(self)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Data> {
        self.data.lock().unwrap()
    }
}

fn build_tree(topics: &[Topic], parent: Option<i64>) -> Vec<Topic> {
    topics
        .iter()
        .filter(|t| t.parent_id == parent)
        .map(|t| Topic {
            children: build_tree(topics, Some(t.id)),
            ..t.clone()
        })
        .collect()
}

async fn all_topics(State(backend): State<FakeBackend>) -> Json<Vec<Topic>> {
    Json(backend.lock().topics.clone())
}

async fn topic_tree(State(backend): State<FakeBackend>) -> Json<Vec<Topic>> {
    Json(build_tree(&backend.lock().topics, None))
}

#[derive(Deserialize)]
struct SearchParams {
    keyword: String,
}

async fn search_topics(
    State(backend): State<FakeBackend>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<Topic>> {
    let keyword = params.keyword.to_lowercase();
    let topics = backend
        .lock()
        .topics
        .iter()
        .filter(|t| t.title.to_lowercase().contains(&keyword))
        .cloned()
        .collect();
    Json(topics)
}

async fn topic_by_slug(
    State(backend): State<FakeBackend>,
    Path(slug): Path<String>,
) -> ApiResult<Topic> {
    backend
        .lock()
        .topics
        .iter()
        .find(|t| t.slug == slug)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found(format!("/api/topics/slug/{slug}")))
}

async fn topics_by_tag(
    State(backend): State<FakeBackend>,
    Path(name): Path<String>,
) -> Json<Vec<Topic>> {
    let topics = backend
        .lock()
        .topics
        .iter()
        .filter(|t| t.tags.iter().any(|tag| tag.name == name))
        .cloned()
        .collect();
    Json(topics)
}

async fn topic_by_id(State(backend): State<FakeBackend>, Path(id): Path<i64>) -> ApiResult<Topic> {
    backend
        .lock()
        .topics
        .iter()
        .find(|t| t.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found(format!("/api/topics/{id}")))
}

fn tags_for(data: &Data, request: &CreateTopicRequest) -> Vec<Tag> {
    let ids = request.tag_ids.clone().unwrap_or_default();
    data.tags
        .iter()
        .filter(|t| ids.contains(&t.id))
        .cloned()
        .collect()
}

async fn create_topic(
    State(backend): State<FakeBackend>,
    Json(request): Json<CreateTopicRequest>,
) -> (StatusCode, Json<Topic>) {
    let tags = tags_for(&backend.lock(), &request);
    let topic = backend.insert_topic(
        &request.title,
        &request.slug,
        &request.content,
        request.parent_id,
        tags,
    );
    (StatusCode::CREATED, Json(topic))
}

async fn update_topic(
    State(backend): State<FakeBackend>,
    Path(id): Path<i64>,
    Json(request): Json<CreateTopicRequest>,
) -> ApiResult<Topic> {
    let mut data = backend.lock();
    let tags = tags_for(&data, &request);
    let topic = data
        .topics
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| not_found(format!("/api/topics/{id}")))?;

    topic.title = request.title;
    topic.slug = request.slug;
    topic.content = request.content;
    topic.parent_id = request.parent_id;
    topic.display_order = request.display_order.unwrap_or(topic.display_order);
    topic.tags = tags;
    Ok(Json(topic.clone()))
}

async fn delete_topic(State(backend): State<FakeBackend>, Path(id): Path<i64>) -> Response {
    let mut data = backend.lock();
    let before = data.topics.len();
    data.topics.retain(|t| t.id != id);
    if data.topics.len() == before {
        return not_found(format!("/api/topics/{id}"));
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn all_tags(State(backend): State<FakeBackend>) -> Json<Vec<Tag>> {
    Json(backend.lock().tags.clone())
}

async fn tag_by_id(State(backend): State<FakeBackend>, Path(id): Path<i64>) -> ApiResult<Tag> {
    backend
        .lock()
        .tags
        .iter()
        .find(|t| t.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found(format!("/api/tags/{id}")))
}

#[derive(Deserialize)]
struct CreateTagParams {
    name: String,
    color: Option<String>,
}

async fn create_tag(
    State(backend): State<FakeBackend>,
    Query(params): Query<CreateTagParams>,
) -> (StatusCode, Json<Tag>) {
    let tag = backend.insert_tag(&params.name, params.color.as_deref());
    (StatusCode::CREATED, Json(tag))
}

async fn delete_tag(State(backend): State<FakeBackend>, Path(id): Path<i64>) -> Response {
    let mut data = backend.lock();
    let before = data.tags.len();
    data.tags.retain(|t| t.id != id);
    if data.tags.len() == before {
        return not_found(format!("/api/tags/{id}"));
    }
    StatusCode::NO_CONTENT.into_response()
}
