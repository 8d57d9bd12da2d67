// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WebSocket observers.
//!
//! Server -> Client (JSON text frames):
//! ```json
//! {"event": "new-message", "data": { ...ticket... }}
//! {"event": "message-updated", "data": { ...ticket... }}
//! ```
//!
//! Client -> Server (JSON):
//! ```json
//! {"type": "agent-login", "agentName": "Sarah Johnson"}
//! ```

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;

use triage_bus::Subscription;

use crate::server::GatewayState;

/// Messages an observer may send.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum ObserverMessage {
    AgentLogin {
        #[serde(rename = "agentName")]
        agent_name: String,
    },
}

/// WebSocket upgrade handler.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<GatewayState>) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Register the socket with the bus and pump events until either side
/// goes away.
async fn handle_socket(socket: WebSocket, state: GatewayState) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let bus = Arc::clone(state.service.bus());
    let Subscription {
        id,
        receiver: mut events,
    } = bus.register();

    // Forward bus events to the client. Ends when the bus drops our sender.
    let mut sender_task = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let text = match event.to_json() {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unencodable event");
                    continue;
                }
            };
            if ws_sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
        let _ = ws_sender.close().await;
    });

    let receive_loop = async {
        while let Some(Ok(msg)) = ws_receiver.next().await {
            match msg {
                Message::Text(text) => match serde_json::from_str::<ObserverMessage>(&text) {
                    Ok(ObserverMessage::AgentLogin { agent_name }) => {
                        bus.identify(&id, &agent_name);
                    }
                    Err(e) => tracing::debug!(observer_id = %id, "ignoring observer message: {e}"),
                },
                Message::Close(_) => break,
                _ => {} // Binary and ping frames carry nothing for us.
            }
        }
    };

    tokio::select! {
        _ = &mut sender_task => {}
        _ = receive_loop => {}
    }

    bus.unregister(&id);
    sender_task.abort();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_login_deserializes() {
        let msg: ObserverMessage =
            serde_json::from_str(r#"{"type": "agent-login", "agentName": "Mike Chen"}"#).unwrap();
        assert_eq!(
            msg,
            ObserverMessage::AgentLogin {
                agent_name: "Mike Chen".to_string()
            }
        );
    }

    #[test]
    fn unknown_message_type_is_rejected() {
        assert!(serde_json::from_str::<ObserverMessage>(r#"{"type": "typing"}"#).is_err());
        assert!(serde_json::from_str::<ObserverMessage>(r#"{"type": "agent-login"}"#).is_err());
    }
}
