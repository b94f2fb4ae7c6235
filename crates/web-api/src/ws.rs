//! WebSocket 通道
//!
//! 每个连接一条显式接收循环：读入一帧、解出事件标签、交给中继，
//! 直到对端断开或读出错。出站方向由独立的发送任务消费每连接队列。

use axum::{
    extract::{
        ws::{Message as WsMessage, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use domain::ClientEvent;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::state::AppState;

pub async fn websocket_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let registry = state.relay.registry().clone();
    let (mut sink, mut stream) = socket.split();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let connection_id = registry.register(tx).await;
    info!(%connection_id, "WebSocket 连接已建立");

    // 发送任务：把广播事件序列化成文本帧写给对端
    let send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let payload = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(err) => {
                    warn!(error = %err, "failed to serialize websocket payload");
                    continue;
                }
            };
            if sink.send(WsMessage::Text(payload.into())).await.is_err() {
                break;
            }
        }
    });

    // 接收循环：负载不做任何校验，认不出标签的帧直接忽略
    while let Some(Ok(message)) = stream.next().await {
        match message {
            WsMessage::Text(text) => {
                let event: ClientEvent = match serde_json::from_str(&text) {
                    Ok(event) => event,
                    Err(err) => {
                        debug!(%connection_id, error = %err, "忽略无法识别的帧");
                        continue;
                    }
                };
                state.relay.dispatch(connection_id, event).await;
            }
            WsMessage::Close(_) => break,
            // Ping/Pong 由协议栈应答，二进制帧不在契约内
            WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Binary(_) => {}
        }
    }

    // 断开即注销，未送达的出站事件随之丢弃；
    // 连接生命周期本身不产生任何广播
    registry.unregister(connection_id).await;
    send_task.abort();
    info!(%connection_id, "WebSocket 连接已断开");
}
