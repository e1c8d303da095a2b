//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented; unknown session ids come back as 404 + error
//! DTO instead of a fault.

use std::sync::Arc;

use axum::{
  extract::{Path, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use tracing::{instrument, warn};

use crate::logic;
use crate::protocol::*;
use crate::state::AppState;
use crate::workflow::FieldPatch;

fn workflow_or_not_found(id: &str, out: Option<WorkflowOut>) -> Response {
  match out {
    Some(w) => Json(w).into_response(),
    None => {
      warn!(target: "submission", %id, "Unknown workflow session");
      (
        StatusCode::NOT_FOUND,
        Json(ErrorOut { message: format!("Unknown workflow session: {id}") }),
      )
        .into_response()
    }
  }
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse {
  Json(HealthOut { ok: true })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_catalog(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(CatalogOut {
    categories: state.catalog.categories.clone(),
    tags: state.catalog.tags.clone(),
  })
}

#[instrument(level = "info", skip(state))]
pub async fn http_open_workflow(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(logic::open_workflow(&state).await)
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_get_workflow(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Response {
  workflow_or_not_found(&id, logic::snapshot(&state, &id).await)
}

#[instrument(level = "info", skip(state, patch), fields(%id))]
pub async fn http_update_field(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(patch): Json<FieldPatch>,
) -> Response {
  workflow_or_not_found(&id, logic::apply_field(&state, &id, patch).await)
}

#[instrument(level = "info", skip(state, op), fields(%id))]
pub async fn http_toggle_tag(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(op): Json<TagOp>,
) -> Response {
  workflow_or_not_found(&id, logic::toggle_tag(&state, &id, op).await)
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_submit(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Response {
  workflow_or_not_found(&id, logic::submit(&state, &id).await)
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_dismiss(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Response {
  workflow_or_not_found(&id, logic::dismiss(&state, &id).await)
}
