//! 实时链路的线上事件
//!
//! 客户端和服务端之间的帧格式为 `{"event": "<标签>", "data": <负载>}`。
//! 负载不做任何校验，以 [`serde_json::Value`] 原样透传，帧的形状
//! 属于客户端契约。

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 客户端上行事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// 新消息
    SendMessage(Value),
    /// 删除消息
    DeleteMessage(Value),
    /// 编辑消息
    EditMessage(Value),
}

/// 服务端下行事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// 对应 `send_message`
    ReceiveMessage(Value),
    /// 对应 `delete_message`
    MessageDeleted(Value),
    /// 对应 `edit_message`
    MessageEdited(Value),
}

impl ClientEvent {
    /// 上行事件到下行事件的固定对应关系，负载原样携带。
    pub fn into_broadcast(self) -> ServerEvent {
        match self {
            ClientEvent::SendMessage(payload) => ServerEvent::ReceiveMessage(payload),
            ClientEvent::DeleteMessage(payload) => ServerEvent::MessageDeleted(payload),
            ClientEvent::EditMessage(payload) => ServerEvent::MessageEdited(payload),
        }
    }

    /// 事件标签，用于日志。
    pub fn tag(&self) -> &'static str {
        match self {
            ClientEvent::SendMessage(_) => "send_message",
            ClientEvent::DeleteMessage(_) => "delete_message",
            ClientEvent::EditMessage(_) => "edit_message",
        }
    }
}

impl ServerEvent {
    /// 事件标签，用于日志。
    pub fn tag(&self) -> &'static str {
        match self {
            ServerEvent::ReceiveMessage(_) => "receive_message",
            ServerEvent::MessageDeleted(_) => "message_deleted",
            ServerEvent::MessageEdited(_) => "message_edited",
        }
    }

    /// 事件负载。
    pub fn payload(&self) -> &Value {
        match self {
            ServerEvent::ReceiveMessage(payload) => payload,
            ServerEvent::MessageDeleted(payload) => payload,
            ServerEvent::MessageEdited(payload) => payload,
        }
    }
}
