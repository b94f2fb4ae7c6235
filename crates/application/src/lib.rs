//! 应用层实现。
//!
//! 这里提供围绕领域模型的用例服务、存储抽象，以及实时广播的
//! 连接注册表和事件中继。

pub mod error;
pub mod registry;
pub mod relay;
pub mod repository;
pub mod services;

pub use error::ApplicationError;
pub use registry::{ConnectionId, ConnectionRegistry, EventSender};
pub use relay::EventRelay;
pub use repository::{MessageRepository, UserRepository};
pub use services::{
    MessageService, MessageServiceDependencies, UserService, UserServiceDependencies,
};
