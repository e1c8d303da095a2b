//! Small utility helpers used across modules.

/// Canonical form of a tag label: trimmed and lowercased.
/// Tag sets and catalog lookups both operate on this form, so mixed-case
/// duplicates collapse before they can enter a draft.
pub fn normalize_tag(label: &str) -> String {
  label.trim().to_lowercase()
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge request/response payloads.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max { s.to_string() } else { format!("{}… ({} bytes total)", &s[..max], s.len()) }
}
