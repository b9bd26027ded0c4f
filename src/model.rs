use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

/// 知识库中的一个主题
///
/// `children` 只在通过树接口获取时才会被填充，父子关系由后端根据 `parent_id` 构建，
/// 前端只负责展示。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: i64,
    pub title: String,
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_order: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<Topic>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl Topic {
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// 标签，与主题多对多
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

impl Tag {
    /// 徽章默认颜色
    pub const DEFAULT_COLOR: &'static str = "#6b7280";

    pub fn color(&self) -> &str {
        self.color
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(Self::DEFAULT_COLOR)
    }
}

/// 创建或整体替换主题时的请求体
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTopicRequest {
    pub title: String,
    pub slug: String,
    pub content: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<i64>>,
}

/// 后端返回的错误响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<HashMap<String, String>>,
}

/// 结构化内容块
///
/// 通过 JSON 中的 `type` 字段区分，未知的类型在反序列化时就会失败，
/// 渲染时的匹配因此总是穷尽的。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text {
        id: String,
        content: String,
    },
    Code {
        id: String,
        language: String,
        code: String,
    },
    Image {
        id: String,
        url: String,
        alt: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
}

/// 把 JSON 中的 `null` 当作默认值处理
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
