use std::sync::Arc;

use domain::{ChatMessage, MessageId, NewMessage, UserId};
use tracing::info;

use crate::{error::ApplicationError, repository::MessageRepository};

pub struct MessageServiceDependencies {
    pub message_repository: Arc<dyn MessageRepository>,
}

/// 消息用例服务。持久化和实时广播是两条独立的链路：
/// 这里只负责数据库记录，广播由客户端另行通过 WebSocket 发起。
pub struct MessageService {
    deps: MessageServiceDependencies,
}

impl MessageService {
    pub fn new(deps: MessageServiceDependencies) -> Self {
        Self { deps }
    }

    /// 插入消息，返回数据库分配的 id。用户是否存在由外键约束保证。
    pub async fn create(&self, message: NewMessage) -> Result<MessageId, ApplicationError> {
        let id = self.deps.message_repository.insert(message).await?;
        info!(message_id = %id, "消息已入库");
        Ok(id)
    }

    pub async fn list(&self) -> Result<Vec<ChatMessage>, ApplicationError> {
        Ok(self.deps.message_repository.list_all().await?)
    }

    pub async fn list_by_user(&self, user_id: UserId) -> Result<Vec<ChatMessage>, ApplicationError> {
        Ok(self.deps.message_repository.list_by_user(user_id).await?)
    }

    pub async fn get(&self, id: MessageId) -> Result<Option<ChatMessage>, ApplicationError> {
        Ok(self.deps.message_repository.find_by_id(id).await?)
    }

    /// 返回受影响的行数，0 表示目标消息不存在。
    pub async fn update_text(&self, id: MessageId, text: &str) -> Result<u64, ApplicationError> {
        let affected = self.deps.message_repository.update_text(id, text).await?;
        if affected > 0 {
            info!(message_id = %id, "消息已更新");
        }
        Ok(affected)
    }

    pub async fn delete(&self, id: MessageId) -> Result<u64, ApplicationError> {
        let affected = self.deps.message_repository.delete_by_id(id).await?;
        if affected > 0 {
            info!(message_id = %id, "消息已删除");
        }
        Ok(affected)
    }

    /// 删除某个用户的全部消息，返回删除的条数。
    pub async fn delete_by_user(&self, user_id: UserId) -> Result<u64, ApplicationError> {
        let affected = self.deps.message_repository.delete_by_user(user_id).await?;
        info!(user_id = %user_id, affected, "用户消息已清空");
        Ok(affected)
    }
}
