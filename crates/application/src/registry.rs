//! 连接注册表
//!
//! 维护当前在线的实时连接集合，并提供扇出原语。成员集合是整个
//! 实时链路里唯一的共享可变状态，全部修改都在 [`tokio::sync::RwLock`]
//! 之下进行，锁只覆盖 HashMap 访问，从不跨越传输层 I/O。

use std::collections::HashMap;

use domain::ServerEvent;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

/// 连接标识，接入时生成。
pub type ConnectionId = Uuid;

/// 每连接的出站事件发送端。无界队列：慢的接收端只会积压自己的
/// 缓冲，不会阻塞对其他连接的投递。
pub type EventSender = mpsc::UnboundedSender<ServerEvent>;

/// 在线连接集合
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<ConnectionId, EventSender>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// 接纳一个新连接并分配连接 id。没有容量上限。
    pub async fn register(&self, sender: EventSender) -> ConnectionId {
        let connection_id = Uuid::new_v4();
        let mut connections = self.connections.write().await;
        connections.insert(connection_id, sender);
        info!(%connection_id, total = connections.len(), "连接已注册");
        connection_id
    }

    /// 将连接移出集合。幂等：id 不存在时是无害的空操作，
    /// 断开和清理可能互相竞争。
    pub async fn unregister(&self, connection_id: ConnectionId) {
        let mut connections = self.connections.write().await;
        if connections.remove(&connection_id).is_some() {
            info!(%connection_id, total = connections.len(), "连接已注销");
        }
    }

    /// 把事件投递给除 `exclude` 外的所有在线连接。
    ///
    /// 对每个连接的投递相互独立、尽力而为：某个连接的发送端已经
    /// 关闭时跳过它，不影响其余连接，也不向调用方返回错误。
    /// 返回成功投递的份数。
    pub async fn broadcast(&self, event: ServerEvent, exclude: Option<ConnectionId>) -> usize {
        let connections = self.connections.read().await;
        let mut delivered = 0;
        for (connection_id, sender) in connections.iter() {
            if Some(*connection_id) == exclude {
                continue;
            }
            if sender.send(event.clone()).is_err() {
                debug!(%connection_id, "连接正在关闭，跳过投递");
                continue;
            }
            delivered += 1;
        }
        delivered
    }

    /// 当前在线连接数。
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use serde_json::json;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    fn event() -> ServerEvent {
        ServerEvent::ReceiveMessage(json!({"user_id": 1, "message": "hi"}))
    }

    async fn register_pair(
        registry: &ConnectionRegistry,
    ) -> (ConnectionId, UnboundedReceiver<ServerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (registry.register(tx).await, rx)
    }

    #[tokio::test]
    async fn broadcast_delivers_one_copy_to_each_connection() {
        let registry = ConnectionRegistry::new();
        let mut receivers = Vec::new();
        for _ in 0..5 {
            let (_, rx) = register_pair(&registry).await;
            receivers.push(rx);
        }

        let delivered = registry.broadcast(event(), None).await;
        assert_eq!(delivered, 5);

        for rx in receivers.iter_mut() {
            assert_eq!(rx.recv().await.unwrap(), event());
            assert!(rx.try_recv().is_err(), "每个连接只应收到一份");
        }
    }

    #[tokio::test]
    async fn failing_connection_does_not_affect_others() {
        let registry = ConnectionRegistry::new();
        let (_, mut alive_rx) = register_pair(&registry).await;

        // 接收端已经丢弃，发送必然失败
        let (dead_tx, dead_rx) = mpsc::unbounded_channel();
        drop(dead_rx);
        registry.register(dead_tx).await;

        let delivered = registry.broadcast(event(), None).await;
        assert_eq!(delivered, 1);
        assert_eq!(alive_rx.recv().await.unwrap(), event());
    }

    #[tokio::test]
    async fn broadcast_with_exclude_skips_that_connection() {
        let registry = ConnectionRegistry::new();
        let (excluded_id, mut excluded_rx) = register_pair(&registry).await;
        let (_, mut other_rx) = register_pair(&registry).await;

        let delivered = registry.broadcast(event(), Some(excluded_id)).await;
        assert_eq!(delivered, 1);
        assert_eq!(other_rx.recv().await.unwrap(), event());
        assert!(excluded_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn broadcast_with_zero_connections_is_a_no_op() {
        let registry = ConnectionRegistry::new();
        let delivered = registry.broadcast(event(), None).await;
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn unregister_absent_id_is_a_no_op() {
        let registry = ConnectionRegistry::new();
        let (id, _rx) = register_pair(&registry).await;

        registry.unregister(Uuid::new_v4()).await;
        assert_eq!(registry.connection_count().await, 1);

        // 重复注销同一个 id 也不出错
        registry.unregister(id).await;
        registry.unregister(id).await;
        assert_eq!(registry.connection_count().await, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_register_unregister_broadcast_keeps_membership_consistent() {
        let registry = Arc::new(ConnectionRegistry::new());
        let mut handles = Vec::new();

        // 一半任务注册后立刻注销，一半保持在线，同时穿插广播
        for i in 0..40 {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move {
                let (tx, rx) = mpsc::unbounded_channel();
                let id = registry.register(tx).await;
                registry.broadcast(event(), None).await;
                if i % 2 == 0 {
                    registry.unregister(id).await;
                    drop(rx);
                    None
                } else {
                    Some((id, rx))
                }
            }));
        }

        let mut kept = Vec::new();
        for handle in handles {
            if let Some(pair) = handle.await.unwrap() {
                kept.push(pair);
            }
        }

        // 没有丢失的更新，也没有重复的成员
        assert_eq!(registry.connection_count().await, kept.len());
        let delivered = registry.broadcast(event(), None).await;
        assert_eq!(delivered, kept.len());

        for (id, _) in &kept {
            registry.unregister(*id).await;
        }
        assert_eq!(registry.connection_count().await, 0);
    }
}
