//! WebSocket upgrade + message loop. Each connection owns one workflow
//! session for its lifetime; client messages are parsed as JSON, forwarded to
//! core logic, and answered with a single JSON message per request.

use std::sync::Arc;

use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{error, info, instrument};

use crate::logic;
use crate::protocol::{ClientWsMessage, ServerWsMessage, TagOp, WorkflowOut};
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "exemplar_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  // One workflow per connection; the session dies with the socket.
  let (id, _) = state.open_session().await;
  info!(target: "exemplar_backend", %id, "WebSocket connected");

  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => handle_client_ws(incoming, &state, &id).await,
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "exemplar_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }

  state.close_session(&id).await;
  info!(target: "exemplar_backend", %id, "WebSocket disconnected");
}

fn workflow_reply(out: Option<WorkflowOut>) -> ServerWsMessage {
  match out {
    Some(workflow) => ServerWsMessage::Workflow { workflow },
    None => ServerWsMessage::Error { message: "Workflow session no longer exists.".into() },
  }
}

#[instrument(level = "debug", skip(msg, state), fields(%id))]
async fn handle_client_ws(msg: ClientWsMessage, state: &AppState, id: &str) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::Snapshot => workflow_reply(logic::snapshot(state, id).await),

    ClientWsMessage::UpdateField { patch } => workflow_reply(logic::apply_field(state, id, patch).await),

    ClientWsMessage::AddTag { label } => workflow_reply(logic::toggle_tag(state, id, TagOp::Add { label }).await),

    ClientWsMessage::RemoveTag { label } => workflow_reply(logic::toggle_tag(state, id, TagOp::Remove { label }).await),

    ClientWsMessage::Submit => {
      let reply = workflow_reply(logic::submit(state, id).await);
      info!(target: "submission", %id, "WS submit handled");
      reply
    }

    ClientWsMessage::Dismiss => workflow_reply(logic::dismiss(state, id).await),
  }
}
