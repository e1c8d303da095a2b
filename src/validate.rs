//! Declarative validation for draft submissions.
//!
//! One pure function: `validate(draft, catalog)` returns a field → message
//! map that is empty iff the draft may be submitted. At most one message per
//! field; the map keys are the wire field names.

use std::collections::BTreeMap;

use crate::domain::{Catalog, DraftSubmission};

// ── Field length limits (in Unicode scalar values) ──────────────────

pub const TITLE_MIN: usize = 3;
pub const TITLE_MAX: usize = 255;
pub const AUTHOR_MIN: usize = 3;
pub const AUTHOR_MAX: usize = 255;
pub const CATEGORY_MIN: usize = 2;
pub const SUMMARY_MIN: usize = 10;
pub const TEXT_MIN: usize = 10;
pub const CODE_MIN: usize = 30;

/// Field-keyed validation messages. Empty iff the draft is submittable.
pub type FieldIssues = BTreeMap<&'static str, String>;

fn chars(s: &str) -> usize {
  s.chars().count()
}

fn bounded_text(issues: &mut FieldIssues, field: &'static str, label: &str, value: &str, min: usize, max: usize) {
  let n = chars(value);
  if n < min {
    issues.insert(field, format!("{label} must be at least {min} characters long."));
  } else if n > max {
    issues.insert(field, format!("{label} must be at most {max} characters long."));
  }
}

fn min_text(issues: &mut FieldIssues, field: &'static str, label: &str, value: &str, min: usize) {
  if chars(value) < min {
    issues.insert(field, format!("{label} must be at least {min} characters long."));
  }
}

/// Evaluate every field rule at once. `complexity` is valid by construction
/// (typed enum) and tag membership is already enforced on every toggle, but
/// the tag subset rule is re-checked here so submit never trusts stale state.
pub fn validate(draft: &DraftSubmission, catalog: &Catalog) -> FieldIssues {
  let mut issues = FieldIssues::new();

  bounded_text(&mut issues, "title", "Title", &draft.title, TITLE_MIN, TITLE_MAX);
  bounded_text(&mut issues, "author", "Author", &draft.author, AUTHOR_MIN, AUTHOR_MAX);

  if chars(&draft.category) < CATEGORY_MIN {
    issues.insert("category", format!("Category must be at least {CATEGORY_MIN} characters long."));
  } else if catalog.category(&draft.category).is_none() {
    issues.insert("category", "Category must be one of the catalog categories.".into());
  }

  if chars(&draft.subcategory) < CATEGORY_MIN {
    issues.insert("subcategory", format!("Subcategory must be at least {CATEGORY_MIN} characters long."));
  } else if !catalog.is_subcategory_of(&draft.category, &draft.subcategory) {
    issues.insert("subcategory", "Subcategory must belong to the selected category.".into());
  }

  if let Some(unknown) = draft.tags.iter().find(|t| !catalog.has_tag(t)) {
    issues.insert("tags", format!("Tag '{unknown}' is not in the tag catalog."));
  }

  min_text(&mut issues, "summary", "Summary", &draft.summary, SUMMARY_MIN);
  min_text(&mut issues, "text", "Text", &draft.text, TEXT_MIN);
  min_text(&mut issues, "code", "Code", &draft.code, CODE_MIN);

  issues
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::seeds::{seed_categories, seed_tags};

  fn catalog() -> Catalog {
    Catalog { categories: seed_categories(), tags: seed_tags() }
  }

  fn valid_draft() -> DraftSubmission {
    let mut draft = DraftSubmission {
      title: "Binary Search".into(),
      author: "Jane".into(),
      category: "Algorithms".into(),
      subcategory: "Searching".into(),
      summary: "A classic divide and conquer search.".into(),
      text: "Explains binary search over sorted arrays.".into(),
      code: "fn binary_search(a: &[i32], t: i32) -> Option<usize> { None }".into(),
      ..Default::default()
    };
    draft.tags.insert("arrays".into());
    draft
  }

  #[test]
  fn valid_draft_yields_no_issues() {
    assert!(validate(&valid_draft(), &catalog()).is_empty());
  }

  #[test]
  fn empty_draft_flags_every_text_field_once() {
    let issues = validate(&DraftSubmission::default(), &catalog());
    for field in ["title", "author", "category", "subcategory", "summary", "text", "code"] {
      assert!(issues.contains_key(field), "missing issue for {field}");
    }
    // complexity and tags are valid by construction on an empty draft
    assert_eq!(issues.len(), 7);
  }

  #[test]
  fn short_summary_uses_the_exact_message() {
    let mut draft = valid_draft();
    draft.summary = "too short".into(); // 9 chars
    let issues = validate(&draft, &catalog());
    assert_eq!(issues.get("summary").map(String::as_str), Some("Summary must be at least 10 characters long."));
    assert_eq!(issues.len(), 1);
  }

  #[test]
  fn overlong_title_is_rejected() {
    let mut draft = valid_draft();
    draft.title = "x".repeat(256);
    let issues = validate(&draft, &catalog());
    assert_eq!(issues.get("title").map(String::as_str), Some("Title must be at most 255 characters long."));
  }

  #[test]
  fn unknown_category_is_rejected_even_when_long_enough() {
    let mut draft = valid_draft();
    draft.category = "Astrology".into();
    let issues = validate(&draft, &catalog());
    assert_eq!(issues.get("category").map(String::as_str), Some("Category must be one of the catalog categories."));
    // the old subcategory no longer belongs anywhere
    assert!(issues.contains_key("subcategory"));
  }

  #[test]
  fn subcategory_must_be_a_child_of_the_selected_category() {
    let mut draft = valid_draft();
    draft.subcategory = "Threads".into(); // belongs to Concurrency, not Algorithms
    let issues = validate(&draft, &catalog());
    assert_eq!(issues.get("subcategory").map(String::as_str), Some("Subcategory must belong to the selected category."));
  }

  #[test]
  fn short_code_is_rejected() {
    let mut draft = valid_draft();
    draft.code = "fn f() {}".into();
    let issues = validate(&draft, &catalog());
    assert_eq!(issues.get("code").map(String::as_str), Some("Code must be at least 30 characters long."));
  }

  #[test]
  fn length_counts_characters_not_bytes() {
    let mut draft = valid_draft();
    draft.summary = "héllo wörld".into(); // 11 chars, more bytes
    assert!(validate(&draft, &catalog()).is_empty());
  }
}
