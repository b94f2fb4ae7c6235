use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use application::{MessageRepository, UserRepository};
use domain::{
    ChatMessage, MessageId, NewMessage, NewUser, RepositoryError, User, UserId, UserUpdate,
};

// PostgreSQL 的唯一约束 / 外键约束错误码
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

fn map_sqlx_err(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        let constraint = db_err.constraint().unwrap_or_default().to_owned();
        match db_err.code().as_deref() {
            Some(UNIQUE_VIOLATION) => return RepositoryError::duplicate(constraint),
            Some(FOREIGN_KEY_VIOLATION) => return RepositoryError::foreign_key(constraint),
            _ => {}
        }
    }
    RepositoryError::storage(err.to_string())
}

#[derive(Debug, FromRow)]
struct UserRecord {
    id: i64,
    name: String,
    email: String,
    phone: Option<String>,
    password: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRecord> for User {
    fn from(value: UserRecord) -> Self {
        User {
            id: UserId::from(value.id),
            name: value.name,
            email: value.email,
            phone: value.phone,
            password: value.password,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct MessageRecord {
    id: i64,
    user_id: i64,
    message: String,
    created_at: DateTime<Utc>,
    user_name: String,
    user_email: String,
}

impl From<MessageRecord> for ChatMessage {
    fn from(value: MessageRecord) -> Self {
        ChatMessage {
            id: MessageId::from(value.id),
            user_id: UserId::from(value.user_id),
            message: value.message,
            created_at: value.created_at,
            user_name: value.user_name,
            user_email: value.user_email,
        }
    }
}

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (name, email, phone, password)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, phone, password, created_at, updated_at
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.password)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(User::from(record))
    }

    async fn list_all(&self) -> Result<Vec<User>, RepositoryError> {
        let records = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, name, email, phone, password, created_at, updated_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(records.into_iter().map(User::from).collect())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, name, email, phone, password, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(i64::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(record.map(User::from))
    }

    async fn update(&self, id: UserId, update: UserUpdate) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = $1, email = $2, phone = $3, updated_at = now()
            WHERE id = $4
            "#,
        )
        .bind(&update.name)
        .bind(&update.email)
        .bind(&update.phone)
        .bind(i64::from(id))
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: UserId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(i64::from(id))
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        Ok(result.rows_affected())
    }
}

#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// 读取路径统一联表带出作者信息
const MESSAGE_SELECT: &str = r#"
    SELECT
        m.id,
        m.user_id,
        m.message,
        m.created_at,
        u.name AS user_name,
        u.email AS user_email
    FROM chat_messages m
    INNER JOIN users u ON m.user_id = u.id
"#;

#[async_trait]
impl MessageRepository for PgMessageRepository {
    async fn insert(&self, message: NewMessage) -> Result<MessageId, RepositoryError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO chat_messages (user_id, message) VALUES ($1, $2) RETURNING id",
        )
        .bind(i64::from(message.user_id))
        .bind(&message.message)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(MessageId::from(id))
    }

    async fn list_all(&self) -> Result<Vec<ChatMessage>, RepositoryError> {
        let query = format!("{MESSAGE_SELECT} ORDER BY m.created_at ASC");
        let records = sqlx::query_as::<_, MessageRecord>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        Ok(records.into_iter().map(ChatMessage::from).collect())
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<ChatMessage>, RepositoryError> {
        let query = format!("{MESSAGE_SELECT} WHERE m.user_id = $1 ORDER BY m.created_at DESC");
        let records = sqlx::query_as::<_, MessageRecord>(&query)
            .bind(i64::from(user_id))
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        Ok(records.into_iter().map(ChatMessage::from).collect())
    }

    async fn find_by_id(&self, id: MessageId) -> Result<Option<ChatMessage>, RepositoryError> {
        let query = format!("{MESSAGE_SELECT} WHERE m.id = $1");
        let record = sqlx::query_as::<_, MessageRecord>(&query)
            .bind(i64::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        Ok(record.map(ChatMessage::from))
    }

    async fn update_text(&self, id: MessageId, text: &str) -> Result<u64, RepositoryError> {
        let result = sqlx::query("UPDATE chat_messages SET message = $1 WHERE id = $2")
            .bind(text)
            .bind(i64::from(id))
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        Ok(result.rows_affected())
    }

    async fn delete_by_id(&self, id: MessageId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM chat_messages WHERE id = $1")
            .bind(i64::from(id))
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        Ok(result.rows_affected())
    }

    async fn delete_by_user(&self, user_id: UserId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM chat_messages WHERE user_id = $1")
            .bind(i64::from(user_id))
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        Ok(result.rows_affected())
    }
}
