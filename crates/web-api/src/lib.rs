//! Web API 层。
//!
//! 提供 Axum 路由，将 HTTP 请求委托给应用层的用例服务，
//! 并在 `/ws` 上承载实时广播通道。

mod error;
mod response;
mod routes;
mod state;
mod ws;

pub use error::ApiError;
pub use response::ApiResponse;
pub use routes::router;
pub use state::AppState;
