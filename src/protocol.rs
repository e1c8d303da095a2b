//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{Category, DraftSubmission, Phase, Tag};
use crate::validate::FieldIssues;
use crate::workflow::{FieldPatch, Workflow};

/// Messages the client can send over WebSocket. The connection owns one
/// workflow, so no message carries a session id.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    /// Re-read the current workflow snapshot without changing anything.
    Snapshot,
    UpdateField {
        #[serde(flatten)]
        patch: FieldPatch,
    },
    AddTag {
        label: String,
    },
    RemoveTag {
        label: String,
    },
    Submit,
    Dismiss,
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Workflow {
        workflow: WorkflowOut,
    },
    Error {
        message: String,
    },
}

/// Snapshot DTO shared by WS and HTTP: everything a form client needs to
/// render the workflow after any operation.
#[derive(Debug, Serialize)]
pub struct WorkflowOut {
    pub id: String,
    pub phase: Phase,
    pub draft: DraftSubmission,
    /// One human-readable message per currently violated field.
    pub issues: FieldIssues,
    /// Allowed subcategory titles for the currently chosen category.
    pub subcategory_options: Vec<String>,
    pub confirmation: Option<ConfirmationOut>,
}

/// The confirmation surface: the frozen accepted payload plus its open flag.
#[derive(Debug, Serialize)]
pub struct ConfirmationOut {
    pub open: bool,
    pub content: DraftSubmission,
}

/// Convert one workflow (internal) to the public snapshot DTO.
pub fn to_out(id: &str, wf: &Workflow) -> WorkflowOut {
    WorkflowOut {
        id: id.to_string(),
        phase: wf.phase(),
        draft: wf.draft().clone(),
        issues: wf.issues().clone(),
        subcategory_options: wf.subcategory_options(),
        confirmation: wf.accepted().map(|content| ConfirmationOut {
            open: wf.confirmation_open(),
            content: content.clone(),
        }),
    }
}

//
// HTTP request/response DTOs
//

/// Add or remove one tag; the whole set is never replaced at once.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TagOp {
    Add { label: String },
    Remove { label: String },
}

#[derive(Serialize)]
pub struct CatalogOut {
    pub categories: Vec<Category>,
    pub tags: Vec<Tag>,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub message: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
