//! Application state: the merged catalogs, the creation client, and HTTP
//! workflow sessions.
//!
//! This module owns:
//!   - the read-only Catalog (built-in seeds merged with optional TOML config)
//!   - the creation endpoint client
//!   - the workflow session store for HTTP clients (WebSocket clients get a
//!     session for the lifetime of their connection)
//!
//! Each session holds exactly one Workflow behind its own async mutex. The
//! lock is never held across the creation request; the workflow phase itself
//! guards against concurrent in-flight submits.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, RwLock};
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::config::load_catalog_config_from_env;
use crate::creation::CreationClient;
use crate::domain::{Catalog, Tag};
use crate::seeds::{seed_categories, seed_tags};
use crate::util::normalize_tag;
use crate::workflow::Workflow;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub creation: Option<CreationClient>,
    sessions: Arc<RwLock<HashMap<String, Arc<Mutex<Workflow>>>>>,
}

impl AppState {
    /// Build state from env: load config, merge catalogs, init the client.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let cfg = load_catalog_config_from_env().unwrap_or_default();

        // Config categories first, then built-in seeds that aren't overridden
        // by a config entry of the same title.
        let mut categories = cfg.categories;
        for seed in seed_categories() {
            if !categories.iter().any(|c| c.title == seed.title) {
                categories.push(seed);
            }
        }

        // Tags are canonical lowercase; config labels are normalized on the
        // way in and duplicates are dropped.
        let mut tags: Vec<Tag> = Vec::new();
        for tag in cfg.tags.into_iter().chain(seed_tags()) {
            let label = normalize_tag(&tag.label);
            if !label.is_empty() && !tags.iter().any(|t| t.label == label) {
                tags.push(Tag { label });
            }
        }

        let subcategory_count: usize = categories.iter().map(|c| c.items.len()).sum();
        info!(
            target: "submission",
            categories = categories.len(),
            subcategories = subcategory_count,
            tags = tags.len(),
            "Startup catalog inventory"
        );

        let creation = CreationClient::from_env();
        match &creation {
            Some(c) => info!(target: "exemplar_backend", base_url = %c.base_url, timeout = ?c.timeout, "Creation endpoint client ready"),
            None => error!(target: "exemplar_backend", "Creation endpoint client unavailable; submits will fail back to idle"),
        }

        Self::from_parts(Catalog { categories, tags }, creation)
    }

    /// Assemble state from already-built parts. `new` and the tests both
    /// funnel through here.
    pub fn from_parts(catalog: Catalog, creation: Option<CreationClient>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            creation,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Open a fresh workflow session and return its id and handle.
    // TODO: evict sessions abandoned by HTTP clients; the map only shrinks on
    // explicit close today.
    #[instrument(level = "debug", skip(self))]
    pub async fn open_session(&self) -> (String, Arc<Mutex<Workflow>>) {
        let id = Uuid::new_v4().to_string();
        let wf = Arc::new(Mutex::new(Workflow::new(self.catalog.clone())));
        self.sessions.write().await.insert(id.clone(), wf.clone());
        info!(target: "submission", %id, "Opened workflow session");
        (id, wf)
    }

    /// Look up a live session by id.
    pub async fn session(&self, id: &str) -> Option<Arc<Mutex<Workflow>>> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Drop a session (WebSocket disconnect, or an explicit HTTP close).
    #[instrument(level = "debug", skip(self), fields(%id))]
    pub async fn close_session(&self, id: &str) {
        if self.sessions.write().await.remove(id).is_some() {
            info!(target: "submission", %id, "Closed workflow session");
        }
    }
}
