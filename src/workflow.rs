//! The example submission workflow: one draft, one phase, one confirmation.
//!
//! State machine: `idle --submit(valid)--> submitting --endpoint ok--> success`,
//! `submitting --endpoint fail--> idle`, `success --dismiss--> idle`. An
//! invalid submit stays where it is and only refreshes the field messages.
//!
//! The network call is bracketed by `begin_submit` / `complete_submit` so the
//! in-flight guard works without holding any lock across the request: once
//! `begin_submit` has moved the phase to `submitting`, a second submit is
//! rejected before it can reach the wire.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};

use crate::domain::{Catalog, Complexity, DraftSubmission, Phase};
use crate::util::normalize_tag;
use crate::validate::{validate, FieldIssues};

/// One scalar field edit. Tags are toggled with [`Workflow::add_tag`] /
/// [`Workflow::remove_tag`] instead of whole-set replacement.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum FieldPatch {
  Title(String),
  Author(String),
  Category(String),
  Subcategory(String),
  Complexity(Complexity),
  Summary(String),
  Text(String),
  Code(String),
}

/// Why a submit attempt never reached the network.
#[derive(Clone, Debug, PartialEq)]
pub enum SubmitRejection {
  /// A creation request is already in flight for this workflow.
  AlreadySubmitting,
  /// One message per violated field; the draft stays editable.
  Invalid(FieldIssues),
}

/// One workflow instance. Exclusively owned by its surface (a WebSocket task
/// or one HTTP session slot); nothing here is shared across instances.
pub struct Workflow {
  catalog: Arc<Catalog>,
  draft: DraftSubmission,
  phase: Phase,
  issues: FieldIssues,
  accepted: Option<DraftSubmission>,
}

impl Workflow {
  /// Fresh workflow: empty draft, idle, no messages shown yet.
  pub fn new(catalog: Arc<Catalog>) -> Self {
    Self {
      catalog,
      draft: DraftSubmission::default(),
      phase: Phase::Idle,
      issues: FieldIssues::new(),
      accepted: None,
    }
  }

  pub fn draft(&self) -> &DraftSubmission {
    &self.draft
  }

  pub fn phase(&self) -> Phase {
    self.phase
  }

  pub fn issues(&self) -> &FieldIssues {
    &self.issues
  }

  /// The frozen payload last accepted by the creation endpoint, if any.
  pub fn accepted(&self) -> Option<&DraftSubmission> {
    self.accepted.as_ref()
  }

  /// The confirmation surface is open exactly while the phase is `success`.
  pub fn confirmation_open(&self) -> bool {
    self.phase == Phase::Success
  }

  /// Allowed subcategory titles for the currently chosen category.
  pub fn subcategory_options(&self) -> Vec<String> {
    self.catalog.subcategories(&self.draft.category)
  }

  /// Apply one scalar field edit. Never fails: constraint violations surface
  /// as field messages, which are recomputed after every change.
  #[instrument(level = "debug", skip(self, patch))]
  pub fn apply(&mut self, patch: FieldPatch) {
    match patch {
      FieldPatch::Title(v) => self.draft.title = v,
      FieldPatch::Author(v) => self.draft.author = v,
      FieldPatch::Category(v) => {
        // Switching category orphans a subcategory that is not among the
        // new category's children.
        if !self.draft.subcategory.is_empty() && !self.catalog.is_subcategory_of(&v, &self.draft.subcategory) {
          debug!(target: "submission", subcategory = %self.draft.subcategory, category = %v,
                 "Clearing subcategory orphaned by category change");
          self.draft.subcategory.clear();
        }
        self.draft.category = v;
      }
      FieldPatch::Subcategory(v) => self.draft.subcategory = v,
      FieldPatch::Complexity(v) => self.draft.complexity = v,
      FieldPatch::Summary(v) => self.draft.summary = v,
      FieldPatch::Text(v) => self.draft.text = v,
      FieldPatch::Code(v) => self.draft.code = v,
    }
    self.issues = validate(&self.draft, &self.catalog);
  }

  /// Add one tag. The label is lowercase-normalized first; labels absent
  /// from the tag catalog are ignored, so the set never holds an unknown or
  /// mixed-case value.
  #[instrument(level = "debug", skip(self), fields(%label))]
  pub fn add_tag(&mut self, label: &str) {
    let tag = normalize_tag(label);
    if tag.is_empty() {
      return;
    }
    if !self.catalog.has_tag(&tag) {
      debug!(target: "submission", %tag, "Ignoring tag not present in the catalog");
      return;
    }
    self.draft.tags.insert(tag);
    self.issues = validate(&self.draft, &self.catalog);
  }

  /// Remove one tag (by its normalized label). Unknown labels are a no-op.
  #[instrument(level = "debug", skip(self), fields(%label))]
  pub fn remove_tag(&mut self, label: &str) {
    let tag = normalize_tag(label);
    if self.draft.tags.remove(&tag) {
      self.issues = validate(&self.draft, &self.catalog);
    }
  }

  /// Validate and enter `submitting`, returning the frozen payload to send.
  ///
  /// Rejects re-entrant calls while a request is in flight, and rejects
  /// invalid drafts before any network work; neither rejection touches the
  /// draft.
  #[instrument(level = "info", skip(self))]
  pub fn begin_submit(&mut self) -> Result<DraftSubmission, SubmitRejection> {
    if self.phase == Phase::Submitting {
      warn!(target: "submission", "Rejecting re-entrant submit while a request is in flight");
      return Err(SubmitRejection::AlreadySubmitting);
    }

    let issues = validate(&self.draft, &self.catalog);
    if !issues.is_empty() {
      info!(target: "submission", violations = issues.len(), "Submit rejected by validation");
      self.issues = issues.clone();
      return Err(SubmitRejection::Invalid(issues));
    }

    self.issues.clear();
    self.phase = Phase::Submitting;
    Ok(self.draft.clone())
  }

  /// Apply the endpoint outcome of the request started by `begin_submit`.
  ///
  /// On success the accepted draft freezes for the confirmation surface and
  /// the live draft resets to empty defaults; on failure the draft survives
  /// unchanged for a retry and the error goes to the submission log sink.
  #[instrument(level = "info", skip(self, outcome), fields(ok = outcome.is_ok()))]
  pub fn complete_submit(&mut self, outcome: Result<(), String>) {
    match outcome {
      Ok(()) => {
        let accepted = std::mem::take(&mut self.draft);
        info!(target: "submission", title = %accepted.title, "Creation endpoint accepted submission");
        self.accepted = Some(accepted);
        self.issues.clear();
        self.phase = Phase::Success;
      }
      Err(e) => {
        error!(target: "submission", error = %e, "Creation request failed; draft kept for retry");
        self.phase = Phase::Idle;
      }
    }
  }

  /// Close the confirmation surface (`success -> idle`). No-op elsewhere.
  #[instrument(level = "debug", skip(self))]
  pub fn dismiss(&mut self) {
    if self.phase == Phase::Success {
      self.phase = Phase::Idle;
    }
  }
}
