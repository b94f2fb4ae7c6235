use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use domain::{ChatMessage, MessageId, NewMessage, NewUser, User, UserId, UserUpdate};

use crate::{error::ApiError, response::ApiResponse, state::AppState, ws};

#[derive(Debug, Deserialize)]
struct CreateUserPayload {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpdateUserPayload {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
}

#[derive(Debug, Serialize)]
struct UserUpdateData {
    id: UserId,
    name: String,
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreateMessagePayload {
    user_id: Option<i64>,
    message: Option<String>,
    user_name: Option<String>,
    created_at: Option<Value>,
}

/// 创建响应回显客户端提交的 user_name / created_at，
/// 实时负载就是由客户端用同一份数据拼出来的。
#[derive(Debug, Serialize)]
struct MessageCreatedData {
    id: MessageId,
    user_id: UserId,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_at: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct UpdateMessagePayload {
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct MessageUpdateData {
    id: MessageId,
    message: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(hello))
        .nest("/api/user", user_routes())
        // `nest` does not match the prefix with a trailing slash in axum 0.8,
        // so expose the list endpoints at `/api/user/` and `/api/message/` too.
        .route("/api/user/", get(get_users))
        .nest("/api/message", message_routes())
        .route("/api/message/", get(get_messages))
        .route("/ws", get(ws::websocket_upgrade))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(add_user))
        .route("/", get(get_users))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
}

fn message_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(add_message))
        .route("/", get(get_messages))
        .route(
            "/user/{user_id}",
            get(get_user_messages).delete(delete_user_messages),
        )
        .route(
            "/{id}",
            get(get_message).put(update_message).delete(delete_message),
        )
}

async fn hello() -> &'static str {
    "Hello World!"
}

/// 必填字段：缺失和空字符串都算没填。
fn required(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

async fn add_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserPayload>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), ApiError> {
    let (Some(name), Some(email)) = (required(payload.name), required(payload.email)) else {
        return Err(ApiError::bad_request("Name and email are required"));
    };

    let user = state
        .user_service
        .create(NewUser {
            name,
            email,
            phone: payload.phone,
            password: payload.password,
        })
        .await
        .map_err(|err| ApiError::from_app("Error creating user", err))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_data("User created successfully", user)),
    ))
}

async fn get_users(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<User>>>, ApiError> {
    let users = state
        .user_service
        .list()
        .await
        .map_err(|err| ApiError::from_app("Error fetching users", err))?;

    Ok(Json(ApiResponse::with_list(
        "Users retrieved successfully",
        users,
    )))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let user = state
        .user_service
        .get(UserId::from(id))
        .await
        .map_err(|err| ApiError::from_app("Error fetching user", err))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(ApiResponse::with_data(
        "User retrieved successfully",
        user,
    )))
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<Json<ApiResponse<UserUpdateData>>, ApiError> {
    let (Some(name), Some(email)) = (required(payload.name), required(payload.email)) else {
        return Err(ApiError::bad_request("Name and email are required"));
    };

    let update = UserUpdate {
        name: name.clone(),
        email: email.clone(),
        phone: payload.phone.clone(),
    };
    let affected = state
        .user_service
        .update(UserId::from(id), update)
        .await
        .map_err(|err| ApiError::from_app("Error updating user", err))?;

    if affected == 0 {
        return Err(ApiError::not_found("User not found"));
    }

    Ok(Json(ApiResponse::with_data(
        "User updated successfully",
        UserUpdateData {
            id: UserId::from(id),
            name,
            email,
            phone: payload.phone,
        },
    )))
}

async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let affected = state
        .user_service
        .delete(UserId::from(id))
        .await
        .map_err(|err| ApiError::from_app("Error deleting user", err))?;

    if affected == 0 {
        return Err(ApiError::not_found("User not found"));
    }

    Ok(Json(ApiResponse::message_only("User deleted successfully")))
}

async fn add_message(
    State(state): State<AppState>,
    Json(payload): Json<CreateMessagePayload>,
) -> Result<(StatusCode, Json<ApiResponse<MessageCreatedData>>), ApiError> {
    let (Some(user_id), Some(message)) = (payload.user_id, required(payload.message)) else {
        return Err(ApiError::bad_request("User ID and message are required"));
    };

    let id = state
        .message_service
        .create(NewMessage {
            user_id: UserId::from(user_id),
            message: message.clone(),
        })
        .await
        .map_err(|err| ApiError::from_app("Error creating message", err))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_data(
            "Message created successfully",
            MessageCreatedData {
                id,
                user_id: UserId::from(user_id),
                message,
                user_name: payload.user_name,
                created_at: payload.created_at,
            },
        )),
    ))
}

async fn get_messages(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ChatMessage>>>, ApiError> {
    let messages = state
        .message_service
        .list()
        .await
        .map_err(|err| ApiError::from_app("Error fetching messages", err))?;

    Ok(Json(ApiResponse::with_list(
        "Messages retrieved successfully",
        messages,
    )))
}

async fn get_user_messages(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<ChatMessage>>>, ApiError> {
    let messages = state
        .message_service
        .list_by_user(UserId::from(user_id))
        .await
        .map_err(|err| ApiError::from_app("Error fetching user messages", err))?;

    Ok(Json(ApiResponse::with_list(
        "User messages retrieved successfully",
        messages,
    )))
}

async fn get_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ChatMessage>>, ApiError> {
    let message = state
        .message_service
        .get(MessageId::from(id))
        .await
        .map_err(|err| ApiError::from_app("Error fetching message", err))?
        .ok_or_else(|| ApiError::not_found("Message not found"))?;

    Ok(Json(ApiResponse::with_data(
        "Message retrieved successfully",
        message,
    )))
}

async fn update_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateMessagePayload>,
) -> Result<Json<ApiResponse<MessageUpdateData>>, ApiError> {
    let Some(message) = required(payload.message) else {
        return Err(ApiError::bad_request("Message content is required"));
    };

    let affected = state
        .message_service
        .update_text(MessageId::from(id), &message)
        .await
        .map_err(|err| ApiError::from_app("Error updating message", err))?;

    if affected == 0 {
        return Err(ApiError::not_found("Message not found"));
    }

    Ok(Json(ApiResponse::with_data(
        "Message updated successfully",
        MessageUpdateData {
            id: MessageId::from(id),
            message,
        },
    )))
}

async fn delete_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let affected = state
        .message_service
        .delete(MessageId::from(id))
        .await
        .map_err(|err| ApiError::from_app("Error deleting message", err))?;

    if affected == 0 {
        return Err(ApiError::not_found("Message not found"));
    }

    Ok(Json(ApiResponse::message_only(
        "Message deleted successfully",
    )))
}

async fn delete_user_messages(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let affected = state
        .message_service
        .delete_by_user(UserId::from(user_id))
        .await
        .map_err(|err| ApiError::from_app("Error deleting user messages", err))?;

    Ok(Json(ApiResponse::with_count(
        format!("Deleted {} message(s)", affected),
        affected as usize,
    )))
}
