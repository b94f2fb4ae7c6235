//! 聊天后端核心领域模型
//!
//! 包含用户、聊天消息等核心实体，以及实时广播链路使用的线上事件类型。

pub mod errors;
pub mod events;
pub mod message;
pub mod user;
pub mod value_objects;

// 重新导出常用类型
pub use errors::*;
pub use events::*;
pub use message::*;
pub use user::*;
pub use value_objects::*;
