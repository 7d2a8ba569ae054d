//! File name helpers and whole-file reads.
//!
//! These work on `/`-separated strings the way dataset configs spell paths,
//! independent of the host's path conventions.

use std::path::Path;

use crate::error::{Result, ScivisError};

/// Reads the whole file into a string.
pub fn file_content(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|e| ScivisError::io(path, e))
}

/// Returns the text after the last `.`, or `""` if there is none.
#[must_use]
pub fn file_extension(fname: &str) -> &str {
    fname.rfind('.').map_or("", |i| &fname[i + 1..])
}

/// Returns the text after the last `/`, or the whole input if there is none.
#[must_use]
pub fn file_basename(path: &str) -> &str {
    path.rfind('/').map_or(path, |i| &path[i + 1..])
}

/// Returns the text before the last `/`, or the whole input if there is none.
#[must_use]
pub fn file_basepath(path: &str) -> &str {
    path.rfind('/').map_or(path, |i| &path[..i])
}
