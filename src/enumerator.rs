//! File enumeration
//!
//! Resolves glob patterns to the concrete set of files to watch. Paths with
//! non-ASCII bytes are filtered out (the watch layer cannot be trusted with
//! them on every platform the original tool targeted) and reported back so
//! the caller can warn about them. A failing walk aborts enumeration
//! entirely; it is fatal for watch setup.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;

use crate::error::RespawnResult;

/// Result of one enumeration pass
#[derive(Debug, Default)]
pub struct Enumeration {
    /// De-duplicated, sorted set of matching files
    pub files: BTreeSet<PathBuf>,
    /// Paths excluded by the ASCII filter
    pub skipped: Vec<PathBuf>,
}

/// Enumerate the files under `root` matching `patterns`.
///
/// A bare pattern like `*.js` matches at any depth, mirroring a recursive
/// directory listing. Standard ignore filters apply, so hidden files and
/// gitignored paths stay out of the watch set unless a pattern names them.
pub fn enumerate_files(root: &Path, patterns: &[String]) -> RespawnResult<Enumeration> {
    let mut overrides = OverrideBuilder::new(root);
    for pattern in patterns {
        let glob = if pattern.contains('/') {
            pattern.clone()
        } else {
            format!("**/{pattern}")
        };
        overrides.add(&glob)?;
    }

    let walk = WalkBuilder::new(root).overrides(overrides.build()?).build();

    let mut result = Enumeration::default();
    for entry in walk {
        let entry = entry?;
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }

        let path = entry.into_path();
        if path.as_os_str().to_string_lossy().is_ascii() {
            result.files.insert(path);
        } else {
            result.skipped.push(path);
        }
    }

    Ok(result)
}
