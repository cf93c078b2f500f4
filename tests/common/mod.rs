//! Shared helpers for end-to-end CLI tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Write an executable shell script into `dir` and return its path.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Count occurrences of an NDJSON event name in captured stdout.
pub fn count_events(stdout: &str, event: &str) -> usize {
    let needle = format!("\"event\":\"{event}\"");
    stdout.lines().filter(|line| line.contains(&needle)).count()
}
