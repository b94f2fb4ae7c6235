//! 测试支撑：内存版存储实现 + 可直接启动的测试服务器。
//!
//! 内存实现的行为对齐 PostgreSQL 版本：邮箱唯一、消息外键指向
//! 用户、删除用户级联删除消息。

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use chrono::Utc;

use application::{
    ConnectionRegistry, EventRelay, MessageRepository, MessageService, MessageServiceDependencies,
    UserRepository, UserService, UserServiceDependencies,
};
use axum::Router;
use domain::{
    ChatMessage, MessageId, NewMessage, NewUser, RepositoryError, User, UserId, UserUpdate,
};
use web_api::{router, AppState};

#[derive(Debug, Clone)]
struct StoredMessage {
    id: i64,
    user_id: i64,
    message: String,
    created_at: domain::Timestamp,
}

struct SharedStore {
    users: Mutex<Vec<User>>,
    messages: Mutex<Vec<StoredMessage>>,
    next_user_id: AtomicI64,
    next_message_id: AtomicI64,
}

impl SharedStore {
    fn new() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            messages: Mutex::new(Vec::new()),
            next_user_id: AtomicI64::new(1),
            next_message_id: AtomicI64::new(1),
        }
    }

    fn join(&self, stored: &StoredMessage) -> Option<ChatMessage> {
        let users = self.users.lock().unwrap();
        let author = users.iter().find(|user| i64::from(user.id) == stored.user_id)?;
        Some(ChatMessage {
            id: MessageId::from(stored.id),
            user_id: UserId::from(stored.user_id),
            message: stored.message.clone(),
            created_at: stored.created_at,
            user_name: author.name.clone(),
            user_email: author.email.clone(),
        })
    }
}

pub struct InMemoryUserRepository {
    store: Arc<SharedStore>,
}

pub struct InMemoryMessageRepository {
    store: Arc<SharedStore>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let password = user.password.ok_or_else(|| {
            RepositoryError::storage("null value in column \"password\" violates not-null constraint")
        })?;

        let mut users = self.store.users.lock().unwrap();
        if users.iter().any(|existing| existing.email == user.email) {
            return Err(RepositoryError::duplicate("users_email_key"));
        }

        let now = Utc::now();
        let stored = User {
            id: UserId::from(self.store.next_user_id.fetch_add(1, Ordering::SeqCst)),
            name: user.name,
            email: user.email,
            phone: user.phone,
            password,
            created_at: now,
            updated_at: now,
        };
        users.push(stored.clone());
        Ok(stored)
    }

    async fn list_all(&self) -> Result<Vec<User>, RepositoryError> {
        let mut users = self.store.users.lock().unwrap().clone();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.0.cmp(&a.id.0)));
        Ok(users)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let users = self.store.users.lock().unwrap();
        Ok(users.iter().find(|user| user.id == id).cloned())
    }

    async fn update(&self, id: UserId, update: UserUpdate) -> Result<u64, RepositoryError> {
        let mut users = self.store.users.lock().unwrap();
        if !users.iter().any(|user| user.id == id) {
            return Ok(0);
        }
        if users
            .iter()
            .any(|existing| existing.id != id && existing.email == update.email)
        {
            return Err(RepositoryError::duplicate("users_email_key"));
        }
        let user = users.iter_mut().find(|user| user.id == id).unwrap();
        user.name = update.name;
        user.email = update.email;
        user.phone = update.phone;
        user.updated_at = Utc::now();
        Ok(1)
    }

    async fn delete(&self, id: UserId) -> Result<u64, RepositoryError> {
        let mut users = self.store.users.lock().unwrap();
        let before = users.len();
        users.retain(|user| user.id != id);
        let removed = (before - users.len()) as u64;
        if removed > 0 {
            // 外键级联删除
            let mut messages = self.store.messages.lock().unwrap();
            messages.retain(|message| message.user_id != i64::from(id));
        }
        Ok(removed)
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn insert(&self, message: NewMessage) -> Result<MessageId, RepositoryError> {
        {
            let users = self.store.users.lock().unwrap();
            if !users.iter().any(|user| user.id == message.user_id) {
                return Err(RepositoryError::foreign_key("chat_messages_user_id_fkey"));
            }
        }

        let id = self.store.next_message_id.fetch_add(1, Ordering::SeqCst);
        let mut messages = self.store.messages.lock().unwrap();
        messages.push(StoredMessage {
            id,
            user_id: i64::from(message.user_id),
            message: message.message,
            created_at: Utc::now(),
        });
        Ok(MessageId::from(id))
    }

    async fn list_all(&self) -> Result<Vec<ChatMessage>, RepositoryError> {
        let mut stored = self.store.messages.lock().unwrap().clone();
        stored.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(stored
            .iter()
            .filter_map(|message| self.store.join(message))
            .collect())
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<ChatMessage>, RepositoryError> {
        let mut stored = self.store.messages.lock().unwrap().clone();
        stored.retain(|message| message.user_id == i64::from(user_id));
        stored.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(stored
            .iter()
            .filter_map(|message| self.store.join(message))
            .collect())
    }

    async fn find_by_id(&self, id: MessageId) -> Result<Option<ChatMessage>, RepositoryError> {
        let stored = self.store.messages.lock().unwrap().clone();
        Ok(stored
            .iter()
            .find(|message| message.id == i64::from(id))
            .and_then(|message| self.store.join(message)))
    }

    async fn update_text(&self, id: MessageId, text: &str) -> Result<u64, RepositoryError> {
        let mut messages = self.store.messages.lock().unwrap();
        let Some(message) = messages.iter_mut().find(|message| message.id == i64::from(id)) else {
            return Ok(0);
        };
        message.message = text.to_owned();
        Ok(1)
    }

    async fn delete_by_id(&self, id: MessageId) -> Result<u64, RepositoryError> {
        let mut messages = self.store.messages.lock().unwrap();
        let before = messages.len();
        messages.retain(|message| message.id != i64::from(id));
        Ok((before - messages.len()) as u64)
    }

    async fn delete_by_user(&self, user_id: UserId) -> Result<u64, RepositoryError> {
        let mut messages = self.store.messages.lock().unwrap();
        let before = messages.len();
        messages.retain(|message| message.user_id != i64::from(user_id));
        Ok((before - messages.len()) as u64)
    }
}

pub fn build_router() -> Router {
    let store = Arc::new(SharedStore::new());
    let user_repository = Arc::new(InMemoryUserRepository {
        store: store.clone(),
    });
    let message_repository = Arc::new(InMemoryMessageRepository { store });

    let user_service = UserService::new(UserServiceDependencies { user_repository });
    let message_service = MessageService::new(MessageServiceDependencies { message_repository });

    let registry = Arc::new(ConnectionRegistry::new());
    let relay = Arc::new(EventRelay::new(registry));

    let state = AppState::new(Arc::new(user_service), Arc::new(message_service), relay);
    router(state)
}

/// 在随机端口上启动测试服务器，返回监听地址。
pub async fn spawn_app() -> SocketAddr {
    let app = build_router();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    addr
}
