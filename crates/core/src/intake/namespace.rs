//! Per-submitter storage namespaces.

use std::fmt;

use super::error::ValidationError;

/// Longest namespace in bytes. Keeps the directory segment well under the
/// 255-byte filename limit of common filesystems.
pub const MAX_NAMESPACE_LEN: usize = 100;

/// Directory segment isolating one submitter's files.
///
/// Only constructed through [`Namespace::resolve`], so it never contains a
/// path separator or a `..` sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace(String);

impl Namespace {
    /// Derive the namespace for a display name.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidName`] when nothing usable is left
    /// after normalization (empty, or only dots).
    pub fn resolve(display_name: &str) -> Result<Self, ValidationError> {
        let normalized = normalize(display_name);
        if normalized.chars().all(|c| c == '.') {
            return Err(ValidationError::InvalidName);
        }
        Ok(Self(normalized))
    }

    /// The namespace as a path segment.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize a display name into a filesystem-safe segment.
///
/// Lowercases, collapses each whitespace run into one `_`, drops `/`, `\`
/// and control characters, then removes every `..` sequence. The result is
/// cut to [`MAX_NAMESPACE_LEN`] bytes at a char boundary. Pure and
/// deterministic.
#[must_use]
pub fn normalize(display_name: &str) -> String {
    let mut out = String::with_capacity(display_name.len());
    let mut in_whitespace = false;

    for c in display_name.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('_');
            }
            in_whitespace = true;
        } else if c != '/' && c != '\\' && !c.is_control() {
            out.push(c);
            in_whitespace = false;
        }
    }

    while out.contains("..") {
        out = out.replace("..", "");
    }
    truncate_at_char_boundary(&mut out, MAX_NAMESPACE_LEN);
    out
}

fn truncate_at_char_boundary(s: &mut String, max: usize) {
    if s.len() <= max {
        return;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s.truncate(end);
}
