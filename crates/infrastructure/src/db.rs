use sqlx::{postgres::PgPoolOptions, PgPool};

/// 创建 PostgreSQL 连接池。
pub async fn create_pg_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}
