//! Workflow behaviors shared by both HTTP and WebSocket handlers.
//!
//! Every function resolves a session id, runs one workflow operation, and
//! returns the fresh snapshot (None for unknown/closed sessions).
//!
//! `submit` runs in three steps so no session lock spans the network call:
//! freeze the payload under the lock, perform the single creation request,
//! then apply the outcome under the lock again. A second submit arriving
//! while the first is in flight observes `submitting` inside `begin_submit`
//! and is rejected without touching the wire.

use tracing::{info, instrument};

use crate::protocol::{to_out, TagOp, WorkflowOut};
use crate::state::AppState;
use crate::workflow::FieldPatch;

/// Open a fresh workflow session and return its first snapshot.
#[instrument(level = "info", skip(state))]
pub async fn open_workflow(state: &AppState) -> WorkflowOut {
  let (id, wf) = state.open_session().await;
  let wf = wf.lock().await;
  to_out(&id, &wf)
}

/// Current snapshot of a session, untouched.
#[instrument(level = "debug", skip(state), fields(%id))]
pub async fn snapshot(state: &AppState, id: &str) -> Option<WorkflowOut> {
  let handle = state.session(id).await?;
  let wf = handle.lock().await;
  Some(to_out(id, &wf))
}

/// Apply one scalar field edit and report the re-validated snapshot.
#[instrument(level = "debug", skip(state, patch), fields(%id))]
pub async fn apply_field(state: &AppState, id: &str, patch: FieldPatch) -> Option<WorkflowOut> {
  let handle = state.session(id).await?;
  let mut wf = handle.lock().await;
  wf.apply(patch);
  Some(to_out(id, &wf))
}

/// Toggle a single tag on or off.
#[instrument(level = "debug", skip(state, op), fields(%id))]
pub async fn toggle_tag(state: &AppState, id: &str, op: TagOp) -> Option<WorkflowOut> {
  let handle = state.session(id).await?;
  let mut wf = handle.lock().await;
  match op {
    TagOp::Add { label } => wf.add_tag(&label),
    TagOp::Remove { label } => wf.remove_tag(&label),
  }
  Some(to_out(id, &wf))
}

/// Run the full submit contract for one session.
#[instrument(level = "info", skip(state), fields(%id))]
pub async fn submit(state: &AppState, id: &str) -> Option<WorkflowOut> {
  let handle = state.session(id).await?;

  // Step 1: validate and freeze the payload; the lock is released before any
  // network work. Rejections are already reflected in the snapshot.
  let begun = {
    let mut wf = handle.lock().await;
    wf.begin_submit()
  };
  let payload = match begun {
    Ok(payload) => payload,
    Err(_) => {
      let wf = handle.lock().await;
      return Some(to_out(id, &wf));
    }
  };

  // Step 2: exactly one creation request for this submit.
  let outcome = match &state.creation {
    Some(client) => client.create_example(&payload).await,
    None => Err("creation endpoint client unavailable".into()),
  };

  // Step 3: terminal transition (success freezes + resets, failure retains).
  let mut wf = handle.lock().await;
  wf.complete_submit(outcome);
  info!(target: "submission", %id, phase = ?wf.phase(), "Submit finished");
  Some(to_out(id, &wf))
}

/// Close the confirmation surface.
#[instrument(level = "debug", skip(state), fields(%id))]
pub async fn dismiss(state: &AppState, id: &str) -> Option<WorkflowOut> {
  let handle = state.session(id).await?;
  let mut wf = handle.lock().await;
  wf.dismiss();
  Some(to_out(id, &wf))
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::Arc;
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::time::Duration;

  use axum::http::StatusCode;
  use axum::{routing::post, Json, Router};

  use crate::creation::CreationClient;
  use crate::domain::{Catalog, Complexity, Phase};
  use crate::seeds::{seed_categories, seed_tags};

  /// Loopback creation endpoint: counts hits, captures the last body, sleeps
  /// `delay` before answering `status`.
  async fn spawn_endpoint(
    status: StatusCode,
    delay: Duration,
    hits: Arc<AtomicUsize>,
    last_body: Arc<tokio::sync::Mutex<Option<serde_json::Value>>>,
  ) -> String {
    let app = Router::new().route(
      "/examples",
      post(move |Json(body): Json<serde_json::Value>| {
        let hits = hits.clone();
        let last_body = last_body.clone();
        async move {
          hits.fetch_add(1, Ordering::SeqCst);
          *last_body.lock().await = Some(body);
          tokio::time::sleep(delay).await;
          status
        }
      }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
      axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
  }

  async fn state_with_endpoint(status: StatusCode, delay: Duration) -> (AppState, Arc<AtomicUsize>, Arc<tokio::sync::Mutex<Option<serde_json::Value>>>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let last_body = Arc::new(tokio::sync::Mutex::new(None));
    let base = spawn_endpoint(status, delay, hits.clone(), last_body.clone()).await;
    let creation = CreationClient::new(base, Duration::from_secs(5));
    let state = AppState::from_parts(
      Catalog { categories: seed_categories(), tags: seed_tags() },
      creation,
    );
    (state, hits, last_body)
  }

  async fn fill_scenario_draft(state: &AppState, id: &str) {
    for patch in [
      FieldPatch::Title("Binary Search".into()),
      FieldPatch::Author("Jane".into()),
      FieldPatch::Category("Algorithms".into()),
      FieldPatch::Subcategory("Searching".into()),
      FieldPatch::Complexity(Complexity::Medium),
      FieldPatch::Summary("A classic divide and conquer search.".into()),
      FieldPatch::Text("Explains binary search over sorted arrays.".into()),
      FieldPatch::Code("function binarySearch(a, t) { /* elided */ return -1; }".into()),
    ] {
      apply_field(state, id, patch).await.expect("live session");
    }
    toggle_tag(state, id, TagOp::Add { label: "arrays".into() }).await.expect("live session");
  }

  #[tokio::test]
  async fn happy_path_submits_once_and_opens_confirmation() {
    let (state, hits, last_body) = state_with_endpoint(StatusCode::OK, Duration::ZERO).await;
    let opened = open_workflow(&state).await;
    fill_scenario_draft(&state, &opened.id).await;

    let out = submit(&state, &opened.id).await.expect("live session");
    assert_eq!(out.phase, Phase::Success);
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    // the confirmation surface holds the accepted payload, the live draft is
    // reset to empty defaults
    let confirmation = out.confirmation.expect("confirmation open");
    assert!(confirmation.open);
    assert_eq!(confirmation.content.title, "Binary Search");
    assert_eq!(confirmation.content.complexity, Complexity::Medium);
    assert_eq!(out.draft, Default::default());

    // the wire payload matched the draft exactly
    let body = last_body.lock().await.clone().expect("body captured");
    assert_eq!(body["title"], "Binary Search");
    assert_eq!(body["author"], "Jane");
    assert_eq!(body["category"], "Algorithms");
    assert_eq!(body["subcategory"], "Searching");
    assert_eq!(body["complexity"], "medium");
    assert_eq!(body["tags"], serde_json::json!(["arrays"]));
  }

  #[tokio::test]
  async fn invalid_draft_never_reaches_the_endpoint() {
    let (state, hits, _) = state_with_endpoint(StatusCode::OK, Duration::ZERO).await;
    let opened = open_workflow(&state).await;
    fill_scenario_draft(&state, &opened.id).await;
    apply_field(&state, &opened.id, FieldPatch::Summary("too short".into())).await.expect("live session");

    let out = submit(&state, &opened.id).await.expect("live session");
    assert_eq!(out.phase, Phase::Idle);
    assert_eq!(out.issues.get("summary").map(String::as_str), Some("Summary must be at least 10 characters long."));
    assert_eq!(out.draft.summary, "too short");
    assert_eq!(hits.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn endpoint_failure_keeps_the_draft_for_retry() {
    let (state, hits, _) = state_with_endpoint(StatusCode::INTERNAL_SERVER_ERROR, Duration::ZERO).await;
    let opened = open_workflow(&state).await;
    fill_scenario_draft(&state, &opened.id).await;

    let out = submit(&state, &opened.id).await.expect("live session");
    assert_eq!(out.phase, Phase::Idle);
    assert!(out.confirmation.is_none());
    assert_eq!(out.draft.title, "Binary Search");
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    // retrying against the same (still failing) endpoint issues one more
    // request, no more
    submit(&state, &opened.id).await.expect("live session");
    assert_eq!(hits.load(Ordering::SeqCst), 2);
  }

  #[tokio::test]
  async fn racing_submits_issue_exactly_one_request() {
    let (state, hits, _) = state_with_endpoint(StatusCode::OK, Duration::from_millis(200)).await;
    let opened = open_workflow(&state).await;
    fill_scenario_draft(&state, &opened.id).await;

    let (a, b) = tokio::join!(submit(&state, &opened.id), submit(&state, &opened.id));
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    // one side won the race; the loser surfaced the in-flight state and was
    // not retried
    let phases = [a.expect("live").phase, b.expect("live").phase];
    assert!(phases.contains(&Phase::Success), "phases: {phases:?}");
  }

  #[tokio::test]
  async fn missing_creation_client_degrades_to_idle() {
    let state = AppState::from_parts(
      Catalog { categories: seed_categories(), tags: seed_tags() },
      None,
    );
    let opened = open_workflow(&state).await;
    fill_scenario_draft(&state, &opened.id).await;

    let out = submit(&state, &opened.id).await.expect("live session");
    assert_eq!(out.phase, Phase::Idle);
    assert_eq!(out.draft.title, "Binary Search");
  }

  #[tokio::test]
  async fn dismiss_reopens_the_form_after_success() {
    let (state, _, _) = state_with_endpoint(StatusCode::OK, Duration::ZERO).await;
    let opened = open_workflow(&state).await;
    fill_scenario_draft(&state, &opened.id).await;
    submit(&state, &opened.id).await.expect("live session");

    let out = dismiss(&state, &opened.id).await.expect("live session");
    assert_eq!(out.phase, Phase::Idle);
    let confirmation = out.confirmation.expect("payload still readable");
    assert!(!confirmation.open);
  }

  #[tokio::test]
  async fn unknown_session_is_reported_as_none() {
    let (state, _, _) = state_with_endpoint(StatusCode::OK, Duration::ZERO).await;
    assert!(snapshot(&state, "nope").await.is_none());
    assert!(submit(&state, "nope").await.is_none());
  }
}
