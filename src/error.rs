use std::io;

use axum::response::IntoResponse;
use reqwest::StatusCode;

use crate::model::ErrorResponse;

pub type Result<T> = core::result::Result<T, Error>;

/// 后端以错误状态码响应时的错误
///
/// 保留状态码和（如果能解析）后端返回的 [`ErrorResponse`]。
#[derive(Debug, thiserror::Error)]
#[error("api responded with {status}")]
pub struct ApiError {
    pub status: StatusCode,
    pub payload: Option<ErrorResponse>,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// 传输层错误：连接失败、超时、响应体解码失败
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("{0}")]
    Custom(&'static str),
}

impl Error {
    /// 后端是否返回了 404
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Api(ApiError { status, .. }) if *status == StatusCode::NOT_FOUND)
    }

    /// 是否为没有收到任何响应的网络错误（包括超时）
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Reqwest(e) if e.is_connect() || e.is_timeout() || e.is_request())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        match self {
            Error::Reqwest(e) => {
                tracing::error!(%e, "backend request error");
                (StatusCode::BAD_GATEWAY, "Bad Gateway").into_response()
            }
            Error::Api(ApiError { status, .. }) if status == StatusCode::NOT_FOUND => {
                (StatusCode::NOT_FOUND, "NOT FOUND").into_response()
            }
            Error::Api(e) => {
                tracing::error!(status = %e.status, "backend api error");
                (StatusCode::BAD_GATEWAY, "Bad Gateway").into_response()
            }
            Error::Custom(s) => (StatusCode::BAD_REQUEST, s.to_string()).into_response(),
            Error::Config(e) => {
                tracing::error!(%e, "config error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
            Error::Json(e) => {
                tracing::error!(%e, "json error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
            Error::Io(e) => {
                tracing::error!(%e, "file io error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}
