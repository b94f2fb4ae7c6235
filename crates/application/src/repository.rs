use async_trait::async_trait;
use domain::{
    ChatMessage, MessageId, NewMessage, NewUser, RepositoryError, User, UserId, UserUpdate,
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError>;
    async fn list_all(&self) -> Result<Vec<User>, RepositoryError>;
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
    /// 返回受影响的行数，0 表示目标不存在。
    async fn update(&self, id: UserId, update: UserUpdate) -> Result<u64, RepositoryError>;
    async fn delete(&self, id: UserId) -> Result<u64, RepositoryError>;
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// 插入消息并返回数据库分配的 id。
    async fn insert(&self, message: NewMessage) -> Result<MessageId, RepositoryError>;
    /// 全量历史，按 created_at 升序。
    async fn list_all(&self) -> Result<Vec<ChatMessage>, RepositoryError>;
    /// 某个用户的消息，按 created_at 降序。
    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<ChatMessage>, RepositoryError>;
    async fn find_by_id(&self, id: MessageId) -> Result<Option<ChatMessage>, RepositoryError>;
    async fn update_text(&self, id: MessageId, text: &str) -> Result<u64, RepositoryError>;
    async fn delete_by_id(&self, id: MessageId) -> Result<u64, RepositoryError>;
    async fn delete_by_user(&self, user_id: UserId) -> Result<u64, RepositoryError>;
}
