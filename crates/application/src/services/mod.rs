mod message_service;
mod user_service;

pub use message_service::{MessageService, MessageServiceDependencies};
pub use user_service::{UserService, UserServiceDependencies};
