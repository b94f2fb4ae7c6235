use application::ApplicationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::RepositoryError;
use serde::Serialize;

/// 错误响应体：`{"success": false, "message": ..., "error"?: ...}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>, error: Option<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                success: false,
                message: message.into(),
                error,
            },
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, None)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message, None)
    }

    /// 把应用层错误折叠成 500 响应。已知的约束冲突换成对
    /// 客户端友好的提示，其余情况用 `fallback`，错误详情一律
    /// 带在 `error` 字段里。
    pub fn from_app(fallback: &str, error: ApplicationError) -> Self {
        let ApplicationError::Repository(repo_err) = &error;
        let message = match repo_err {
            RepositoryError::Duplicate { .. } => "Email already exists",
            RepositoryError::ForeignKey { .. } => "User not found",
            _ => fallback,
        };
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message,
            Some(error.to_string()),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
