//! 主应用程序入口
//!
//! 启动 Axum Web API 服务和实时广播通道。

use std::sync::Arc;

use application::{
    ConnectionRegistry, EventRelay, MessageService, MessageServiceDependencies, UserService,
    UserServiceDependencies,
};
use config::AppConfig;
use infrastructure::{create_pg_pool, PgMessageRepository, PgUserRepository};
use tracing_subscriber::EnvFilter;
use web_api::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = AppConfig::from_env_with_defaults();
    tracing::info!(
        "连接数据库: {}",
        config.database.url.split('@').next_back().unwrap_or("unknown")
    );

    let pg_pool = create_pg_pool(&config.database.url, config.database.max_connections).await?;

    // 运行迁移
    sqlx::migrate!("../../migrations").run(&pg_pool).await?;

    // 创建存储实例
    let user_repository = Arc::new(PgUserRepository::new(pg_pool.clone()));
    let message_repository = Arc::new(PgMessageRepository::new(pg_pool));

    // 创建应用层服务
    let user_service = UserService::new(UserServiceDependencies { user_repository });
    let message_service = MessageService::new(MessageServiceDependencies { message_repository });

    // 实时广播链路：连接注册表 + 事件中继
    let registry = Arc::new(ConnectionRegistry::new());
    let relay = Arc::new(EventRelay::new(registry));

    let state = AppState::new(Arc::new(user_service), Arc::new(message_service), relay);

    // 启动 Web 服务器
    let app = router(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("聊天服务器启动在 http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
