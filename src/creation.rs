//! Minimal client for the catalog creation endpoint.
//!
//! One call: POST the serialized draft to `{base}/examples` as JSON. Any 2xx
//! status counts as accepted; everything else (or a transport fault) comes
//! back as an error string for the submission log sink. The response body
//! carries no contract beyond the status, so it is read only to log errors.
//!
//! The upstream contract specifies no timeout. Requests that outlive the
//! client timeout fail the submit instead of hanging the workflow in
//! `submitting`; see DESIGN.md for the chosen default.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use tracing::{info, instrument};

use crate::domain::DraftSubmission;
use crate::util::trunc_for_log;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8081/api";
const DEFAULT_TIMEOUT_SECS: u64 = 20;

#[derive(Clone)]
pub struct CreationClient {
  client: reqwest::Client,
  pub base_url: String,
  pub timeout: Duration,
}

impl CreationClient {
  /// Build a client for `base_url` with the given request timeout.
  pub fn new(base_url: String, timeout: Duration) -> Option<Self> {
    let client = reqwest::Client::builder().timeout(timeout).build().ok()?;
    Some(Self { client, base_url, timeout })
  }

  /// Construct from CREATION_API_URL / CREATION_TIMEOUT_SECS (both optional).
  pub fn from_env() -> Option<Self> {
    let base_url = std::env::var("CREATION_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
    let timeout_secs = std::env::var("CREATION_TIMEOUT_SECS")
      .ok()
      .and_then(|s| s.parse::<u64>().ok())
      .unwrap_or(DEFAULT_TIMEOUT_SECS);
    Self::new(base_url, Duration::from_secs(timeout_secs))
  }

  /// POST one draft submission. `Ok(())` on any 2xx status.
  #[instrument(level = "info", skip(self, draft), fields(title_len = draft.title.len(), tag_count = draft.tags.len()))]
  pub async fn create_example(&self, draft: &DraftSubmission) -> Result<(), String> {
    let url = format!("{}/examples", self.base_url);
    let start = std::time::Instant::now();

    let res = self.client.post(&url)
      .header(USER_AGENT, "exemplar-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .json(draft)
      .send().await.map_err(|e| e.to_string())?;

    let status = res.status();
    if !status.is_success() {
      let body = res.text().await.unwrap_or_default();
      return Err(format!("creation endpoint HTTP {}: {}", status, trunc_for_log(&body, 200)));
    }

    info!(target: "submission", %status, elapsed = ?start.elapsed(), "Creation endpoint accepted payload");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::Arc;
  use std::sync::atomic::{AtomicUsize, Ordering};

  use axum::{routing::post, Json, Router};
  use axum::http::StatusCode;

  /// Bind a loopback creation endpoint returning `status`, counting hits and
  /// remembering the last body it saw.
  async fn spawn_endpoint(
    status: StatusCode,
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

  fn draft() -> DraftSubmission {
    let mut d = DraftSubmission {
      title: "Binary Search".into(),
      author: "Jane".into(),
      category: "Algorithms".into(),
      subcategory: "Searching".into(),
      summary: "A classic divide and conquer search.".into(),
      text: "Explains binary search over sorted arrays.".into(),
      code: "function binarySearch(a, t) { /* elided */ return -1; }".into(),
      ..Default::default()
    };
    d.tags.insert("arrays".into());
    d
  }

  #[tokio::test]
  async fn ok_status_is_success_and_sends_the_wire_payload() {
    let hits = Arc::new(AtomicUsize::new(0));
    let last_body = Arc::new(tokio::sync::Mutex::new(None));
    let base = spawn_endpoint(StatusCode::CREATED, hits.clone(), last_body.clone()).await;

    let client = CreationClient::new(base, Duration::from_secs(5)).expect("client");
    client.create_example(&draft()).await.expect("2xx accepted");

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    let body = last_body.lock().await.clone().expect("body captured");
    assert_eq!(body["title"], "Binary Search");
    assert_eq!(body["tags"], serde_json::json!(["arrays"]));
    assert_eq!(body["complexity"], "easy");
  }

  #[tokio::test]
  async fn non_ok_status_maps_to_an_error_with_the_status() {
    let hits = Arc::new(AtomicUsize::new(0));
    let last_body = Arc::new(tokio::sync::Mutex::new(None));
    let base = spawn_endpoint(StatusCode::SERVICE_UNAVAILABLE, hits.clone(), last_body).await;

    let client = CreationClient::new(base, Duration::from_secs(5)).expect("client");
    let err = client.create_example(&draft()).await.expect_err("non-2xx fails");

    assert!(err.contains("503"), "error should carry the status: {err}");
    assert_eq!(hits.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn unreachable_endpoint_is_a_transport_error() {
    // Nothing listens on this port.
    let client = CreationClient::new("http://127.0.0.1:9".into(), Duration::from_secs(1)).expect("client");
    assert!(client.create_example(&draft()).await.is_err());
  }
}
