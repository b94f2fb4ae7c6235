use std::sync::Arc;

use application::{EventRelay, MessageService, UserService};

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub message_service: Arc<MessageService>,
    pub relay: Arc<EventRelay>,
}

impl AppState {
    pub fn new(
        user_service: Arc<UserService>,
        message_service: Arc<MessageService>,
        relay: Arc<EventRelay>,
    ) -> Self {
        Self {
            user_service,
            message_service,
            relay,
        }
    }
}
