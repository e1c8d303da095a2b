//! Built-in catalog defaults so the service is useful without external config.

use crate::domain::{Category, Subcategory, Tag};

fn category(title: &str, items: &[&str]) -> Category {
  Category {
    title: title.into(),
    items: items.iter().map(|t| Subcategory { title: (*t).into() }).collect(),
  }
}

/// Default category tree shown in the category/subcategory selectors.
pub fn seed_categories() -> Vec<Category> {
  vec![
    category("Algorithms", &["Sorting", "Searching", "Recursion", "Graphs", "Dynamic Programming"]),
    category("Data Structures", &["Arrays", "Linked Lists", "Trees", "Hash Maps", "Stacks & Queues"]),
    category("Language Features", &["Closures", "Generics", "Iterators", "Error Handling"]),
    category("Concurrency", &["Threads", "Async", "Channels"]),
  ]
}

/// Default tag list shown as toggles. Labels are canonical lowercase.
pub fn seed_tags() -> Vec<Tag> {
  [
    "arrays", "strings", "loops", "recursion", "sorting", "searching",
    "trees", "graphs", "closures", "iterators", "async", "beginner-friendly",
  ]
  .iter()
  .map(|l| Tag { label: (*l).into() })
  .collect()
}
