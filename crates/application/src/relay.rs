//! 事件中继
//!
//! 把某个连接收到的聊天事件扇出给注册表里的全部连接。中继是一条
//! 哑管道：不校验负载、不落库、不重试，投递相对慢速或无响应的
//! 对端是即发即弃的。

use std::sync::Arc;

use domain::ClientEvent;
use tracing::debug;

use crate::registry::{ConnectionId, ConnectionRegistry};

/// 入站事件到广播的桥接
pub struct EventRelay {
    registry: Arc<ConnectionRegistry>,
}

impl EventRelay {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// 处理来自 `connection_id` 的一个上行事件。
    ///
    /// 三种事件的行为一致：转换成对应的下行标签后广播给所有
    /// 在线连接，包括发送者自身。
    pub async fn dispatch(&self, connection_id: ConnectionId, event: ClientEvent) {
        let tag = event.tag();
        let delivered = self.registry.broadcast(event.into_broadcast(), None).await;
        debug!(%connection_id, event = tag, delivered, "事件已转发");
    }
}
