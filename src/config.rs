//! Loading catalog configuration (categories + tags) from TOML.
//!
//! See `CatalogConfig` for the expected schema. Entries from the config are
//! merged over the built-in seeds at startup; the config never replaces the
//! seeds wholesale.

use serde::Deserialize;
use tracing::{info, error};

use crate::domain::{Category, Tag};

/// Schema of the file named by CATALOG_CONFIG_PATH:
///
/// ```toml
/// [[categories]]
/// title = "Algorithms"
/// items = [{ title = "Sorting" }, { title = "Searching" }]
///
/// [[tags]]
/// label = "arrays"
/// ```
#[derive(Clone, Debug, Deserialize, Default)]
pub struct CatalogConfig {
  #[serde(default)]
  pub categories: Vec<Category>,
  #[serde(default)]
  pub tags: Vec<Tag>,
}

/// Attempt to load `CatalogConfig` from CATALOG_CONFIG_PATH. On any
/// parsing/IO error, returns None and the seeds alone are used.
pub fn load_catalog_config_from_env() -> Option<CatalogConfig> {
  let path = std::env::var("CATALOG_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<CatalogConfig>(&s) {
      Ok(cfg) => {
        info!(target: "exemplar_backend", %path, "Loaded catalog config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "exemplar_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "exemplar_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
