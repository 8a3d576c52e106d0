//! WebSocket upgrade + message loop. Each connection owns one `Session`.
//! Client messages are parsed as JSON and fed to the session; a generation
//! request is awaited inline, so the next message is only read once it settles.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{debug, error, info, instrument};

use crate::flow::FlowAction;
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::session::Session;
use crate::state::AppState;

#[instrument(level = "info", skip(ws, state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "quiz_tutor", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

async fn send(socket: &mut WebSocket, msg: &ServerWsMessage) -> Result<(), axum::Error> {
  let out = serde_json::to_string(msg).unwrap_or_else(|e| {
    serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
  });
  socket.send(Message::Text(out)).await
}

async fn send_all(socket: &mut WebSocket, msgs: &[ServerWsMessage]) -> Result<(), axum::Error> {
  for m in msgs {
    send(socket, m).await?;
  }
  Ok(())
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  let mut session = Session::new(state.config.lessons.clone());
  info!(target: "quiz_tutor", session = %session.id, "WebSocket connected");

  // Initial screen.
  if let Err(e) = send(&mut socket, &session.view()).await {
    error!(target: "quiz_tutor", error = %e, "WS send error");
    return;
  }

  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        let incoming = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(m) => m,
          Err(e) => {
            let reply = ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) };
            if send(&mut socket, &reply).await.is_err() { break; }
            continue;
          }
        };
        debug!(target: "quiz_tutor", session = %session.id, "WS received: {:?}", &incoming);

        let step = session.handle(incoming);
        if let Err(e) = send_all(&mut socket, &step.replies).await {
          error!(target: "quiz_tutor", error = %e, "WS send error");
          break;
        }

        if let Some(FlowAction::Generate { lesson }) = step.action {
          let result = state.generate_quiz(&lesson).await;
          if let Err(e) = &result {
            error!(target: "quiz", session = %session.id, %lesson, error = %e, "Quiz generation failed");
          }
          let replies = session.complete(result);
          if let Err(e) = send_all(&mut socket, &replies).await {
            error!(target: "quiz_tutor", error = %e, "WS send error");
            break;
          }
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "quiz_tutor", session = %session.id, "WebSocket disconnected");
}
