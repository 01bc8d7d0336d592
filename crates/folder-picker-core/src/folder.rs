//! Folder data model and server-relative path helpers.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A folder returned by a lister.
///
/// On the wire SharePoint calls these fields `Name` and `ServerRelativeUrl`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Folder {
    /// Display label.
    #[serde(rename = "Name")]
    pub name: String,
    /// Server-relative path, unique within the parent.
    #[serde(rename = "ServerRelativeUrl")]
    pub path: String,
}

impl Folder {
    /// Create a folder entry.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// One page of child folders, in the order the lister returned them.
pub type FolderPage = Vec<Folder>;

/// The `(index, size)` pair used to request one slice of a folder's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageWindow {
    /// Zero-based page index.
    pub index: usize,
    /// Maximum number of items per page.
    pub size: usize,
}

impl PageWindow {
    /// Create a page window.
    pub fn new(index: usize, size: usize) -> Self {
        Self { index, size }
    }

    /// Number of items before this page.
    pub fn skip(&self) -> usize {
        self.index.saturating_mul(self.size)
    }
}

/// Whether a path denotes the site root.
pub fn is_root(path: &str) -> bool {
    path.is_empty() || path == "/"
}

/// Compute the parent of a server-relative folder path.
///
/// Splits on `/`, drops the last non-empty segment and rejoins the remaining
/// non-empty segments, each prefixed with `/`. The root has no parent, so an
/// empty input yields an empty output.
pub fn parent_folder(path: &str) -> String {
    let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    segments.pop();
    segments.iter().map(|s| format!("/{s}")).collect()
}

/// Whether `path` equals `ancestor` or lies below it.
pub fn is_within(path: &str, ancestor: &str) -> bool {
    if is_root(ancestor) {
        return true;
    }
    path == ancestor
        || path
            .strip_prefix(ancestor)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Normalize a configured folder path.
///
/// Backslashes become `/`, repeated separators collapse, a leading `/` is
/// ensured and a trailing one dropped. The root normalizes to `""`.
pub fn normalize_folder_path(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let invalid = |reason| ConfigError::InvalidPath {
        path: raw.to_string(),
        reason,
    };

    if trimmed.chars().any(char::is_control) {
        return Err(invalid("contains control characters"));
    }
    if trimmed.contains(['?', '#']) {
        return Err(invalid("contains a query or fragment marker"));
    }

    let mut normalized = String::with_capacity(trimmed.len() + 1);
    for segment in trimmed.split(['/', '\\']).filter(|s| !s.is_empty()) {
        if segment == "." || segment == ".." {
            return Err(invalid("contains relative segments"));
        }
        normalized.push('/');
        normalized.push_str(segment);
    }
    Ok(normalized)
}

/// Normalize a configured path, falling back to the root on error.
///
/// Malformed configuration is never fatal to the control.
pub(crate) fn normalize_or_root(field: &'static str, raw: &str) -> String {
    match normalize_folder_path(raw) {
        Ok(path) => path,
        Err(err) => {
            tracing::warn!(target: "folder_picker_core::config", field, %err, "falling back to root folder");
            String::new()
        }
    }
}
