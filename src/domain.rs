//! Domain models used by the backend: draft submissions, complexity levels,
//! the workflow phase, and the read-only catalogs.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// How much experience a reader needs to follow an example.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
  Easy,
  Medium,
  Hard,
}
impl Default for Complexity {
  fn default() -> Self { Complexity::Easy }
}

/// Where a workflow instance is in its submit lifecycle.
///
/// An explicit enum instead of loading/modal booleans: "submitting" and
/// "success" can never be observed at the same time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
  Idle,
  Submitting,
  Success,
}
impl Default for Phase {
  fn default() -> Self { Phase::Idle }
}

/// The in-progress, not-yet-persisted form data for one candidate example.
///
/// Field names here are the wire names: the struct serializes 1:1 into the
/// JSON body accepted by the creation endpoint, with `tags` as an array of
/// lowercase strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSubmission {
  #[serde(default)] pub title: String,
  #[serde(default)] pub author: String,
  #[serde(default)] pub category: String,
  #[serde(default)] pub subcategory: String,
  #[serde(default)] pub complexity: Complexity,
  #[serde(default)] pub tags: BTreeSet<String>,
  #[serde(default)] pub summary: String,
  #[serde(default)] pub text: String,
  #[serde(default)] pub code: String,
}

/// One selectable category with its subcategory children.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Category {
  pub title: String,
  #[serde(default)] pub items: Vec<Subcategory>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Subcategory {
  pub title: String,
}

/// One selectable tag. Labels are kept lowercase in the catalog.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tag {
  pub label: String,
}

/// Read-only reference lists constraining category, subcategory and tag
/// values. Built once at startup (seeds merged with optional TOML config)
/// and shared by every workflow instance.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
  pub categories: Vec<Category>,
  pub tags: Vec<Tag>,
}

impl Catalog {
  pub fn category(&self, title: &str) -> Option<&Category> {
    self.categories.iter().find(|c| c.title == title)
  }

  /// Subcategory titles allowed under `category`. Empty for unknown titles.
  pub fn subcategories(&self, category: &str) -> Vec<String> {
    self
      .category(category)
      .map(|c| c.items.iter().map(|s| s.title.clone()).collect())
      .unwrap_or_default()
  }

  pub fn is_subcategory_of(&self, category: &str, subcategory: &str) -> bool {
    self
      .category(category)
      .map(|c| c.items.iter().any(|s| s.title == subcategory))
      .unwrap_or(false)
  }

  /// Tag membership. `label` must already be in canonical (lowercase) form.
  pub fn has_tag(&self, label: &str) -> bool {
    self.tags.iter().any(|t| t.label == label)
  }
}
