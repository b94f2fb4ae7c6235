//! 基础设施层。
//!
//! PostgreSQL 连接池与存储接口的 sqlx 实现。

pub mod db;
pub mod repository;

pub use db::create_pg_pool;
pub use repository::{PgMessageRepository, PgUserRepository};
