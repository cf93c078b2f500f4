//! File watcher
//!
//! One change subscription per watched file. The notify backend runs its own
//! thread; its callback only forwards content-modification signals into the
//! server's channel, so all state still mutates on the server loop thread.
//! No coalescing happens here; collapsing bursts is the coordinator's job.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use notify::event::{Event, EventKind, ModifyKind};
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};

use crate::error::RespawnResult;

/// Per-path watch subscriptions with a grow-only watched set
pub struct FileWatcher {
    watcher: RecommendedWatcher,
    watched: BTreeSet<PathBuf>,
}

impl FileWatcher {
    /// Create a watcher forwarding one signal per changed path into `tx`.
    pub fn new(tx: Sender<PathBuf>) -> RespawnResult<Self> {
        let watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                if let Ok(event) = res {
                    if is_content_modification(&event.kind) {
                        for path in event.paths {
                            let _ = tx.send(path);
                        }
                    }
                }
            },
            Config::default(),
        )?;

        Ok(Self {
            watcher,
            watched: BTreeSet::new(),
        })
    }

    /// Subscribe to change notifications for one file.
    ///
    /// Returns `false` without re-subscribing when the path is already in
    /// the watched set; enumeration passes overlap freely.
    pub fn watch_file(&mut self, path: &Path) -> RespawnResult<bool> {
        if self.watched.contains(path) {
            return Ok(false);
        }
        self.watcher.watch(path, RecursiveMode::NonRecursive)?;
        self.watched.insert(path.to_path_buf());
        Ok(true)
    }

    /// Number of active subscriptions.
    pub fn watched_count(&self) -> usize {
        self.watched.len()
    }
}

/// Only data modifications restart the child; renames, removals and
/// metadata churn are dropped.
fn is_content_modification(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Modify(ModifyKind::Data(_)) | EventKind::Modify(ModifyKind::Any)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{DataChange, MetadataKind, RemoveKind, RenameMode};
    use std::fs;
    use std::sync::mpsc::channel;
    use tempfile::tempdir;

    #[test]
    fn modification_kinds_accepted() {
        assert!(is_content_modification(&EventKind::Modify(
            ModifyKind::Data(DataChange::Content)
        )));
        assert!(is_content_modification(&EventKind::Modify(
            ModifyKind::Data(DataChange::Any)
        )));
        assert!(is_content_modification(&EventKind::Modify(ModifyKind::Any)));
    }

    #[test]
    fn rename_remove_and_metadata_ignored() {
        assert!(!is_content_modification(&EventKind::Modify(
            ModifyKind::Name(RenameMode::Any)
        )));
        assert!(!is_content_modification(&EventKind::Remove(
            RemoveKind::File
        )));
        assert!(!is_content_modification(&EventKind::Modify(
            ModifyKind::Metadata(MetadataKind::Any)
        )));
        assert!(!is_content_modification(&EventKind::Create(
            notify::event::CreateKind::File
        )));
    }

    #[test]
    fn watch_file_subscribes_once_per_path() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("main.js");
        fs::write(&file, "// app").unwrap();

        let (tx, _rx) = channel();
        let mut watcher = FileWatcher::new(tx).unwrap();

        assert!(watcher.watch_file(&file).unwrap());
        assert!(!watcher.watch_file(&file).unwrap());
        assert_eq!(watcher.watched_count(), 1);
    }

    #[test]
    fn dedup_holds_across_enumeration_passes() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.js");
        let b = dir.path().join("b.js");
        fs::write(&a, "").unwrap();
        fs::write(&b, "").unwrap();

        let (tx, _rx) = channel();
        let mut watcher = FileWatcher::new(tx).unwrap();

        // first pass sees only a, second pass sees both
        assert!(watcher.watch_file(&a).unwrap());
        assert!(!watcher.watch_file(&a).unwrap());
        assert!(watcher.watch_file(&b).unwrap());
        assert_eq!(watcher.watched_count(), 2);
    }
}
