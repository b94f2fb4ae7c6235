use serde::{Deserialize, Serialize};

use crate::value_objects::{MessageId, Timestamp, UserId};

/// 聊天消息实体。读取路径总是联表带出作者信息，
/// 所以 user_name / user_email 是实体的一部分。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub user_id: UserId,
    pub message: String,
    pub created_at: Timestamp,
    pub user_name: String,
    pub user_email: String,
}

/// 新建消息的输入。
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub user_id: UserId,
    pub message: String,
}
