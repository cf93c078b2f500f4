//! Dev server loop
//!
//! Wires enumeration, the watcher, the coordinator and the supervisor
//! together. One loop consumes every event: change signals arrive on an
//! mpsc channel and child exits are observed by polling, so all supervisor
//! state mutates on this thread alone.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::coordinator::{ChangeDecision, ExitKind, RestartCoordinator};
use crate::enumerator::enumerate_files;
use crate::error::RespawnResult;
use crate::supervisor::ProcessSupervisor;
use crate::watcher::FileWatcher;

/// Channel poll tick for the server loop
const TICK_MS: u64 = 50;

/// Server event types for logging and NDJSON output
#[derive(Debug, Clone)]
pub enum ServerEvent {
    /// A child was (re)launched
    Started { pid: u32 },
    /// Watch setup finished; total active subscriptions
    Watching { files: usize },
    /// A non-ASCII path was excluded from the watch set
    SkippedPath { path: String },
    /// A watched file was modified
    FileChanged { path: String },
    /// Kill issued, relaunch follows the exit
    Restarting,
    /// Change arrived mid-restart; one follow-up restart latched
    RestartQueued,
    /// The OS confirmed a child exit
    ChildExited {
        pid: u32,
        code: Option<i32>,
        expected: bool,
    },
    /// A relaunch could not be spawned; the next change signal retries
    SpawnFailed { message: String },
    /// Enumeration or subscription failed; the child keeps running unwatched
    WatchSetupFailed { message: String },
    /// The supervisor is exiting
    Shutdown,
}

impl ServerEvent {
    /// True for chatter that `--mute` suppresses.
    pub fn is_informational(&self) -> bool {
        !matches!(
            self,
            ServerEvent::WatchSetupFailed { .. }
                | ServerEvent::SpawnFailed { .. }
                | ServerEvent::ChildExited {
                    expected: false,
                    ..
                }
        )
    }

    pub fn to_json(&self) -> String {
        match self {
            ServerEvent::Started { pid } => {
                format!(r#"{{"event":"started","pid":{}}}"#, pid)
            }
            ServerEvent::Watching { files } => {
                format!(r#"{{"event":"watching","files":{}}}"#, files)
            }
            ServerEvent::SkippedPath { path } => {
                format!(r#"{{"event":"skipped_path","path":"{}"}}"#, escape(path))
            }
            ServerEvent::FileChanged { path } => {
                format!(r#"{{"event":"file_changed","path":"{}"}}"#, escape(path))
            }
            ServerEvent::Restarting => r#"{"event":"restarting"}"#.to_string(),
            ServerEvent::RestartQueued => r#"{"event":"restart_queued"}"#.to_string(),
            ServerEvent::ChildExited {
                pid,
                code,
                expected,
            } => {
                let code = code.map_or("null".to_string(), |c| c.to_string());
                format!(
                    r#"{{"event":"child_exited","pid":{},"code":{},"expected":{}}}"#,
                    pid, code, expected
                )
            }
            ServerEvent::SpawnFailed { message } => {
                format!(
                    r#"{{"event":"spawn_failed","message":"{}"}}"#,
                    escape(message)
                )
            }
            ServerEvent::WatchSetupFailed { message } => {
                format!(
                    r#"{{"event":"watch_setup_failed","message":"{}"}}"#,
                    escape(message)
                )
            }
            ServerEvent::Shutdown => r#"{"event":"shutdown"}"#.to_string(),
        }
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Run the dev server until the running flag goes false.
///
/// Blocks the calling thread; all progress is reported through `on_event`.
pub fn run(
    config: &Config,
    running: Arc<AtomicBool>,
    on_event: impl Fn(ServerEvent),
) -> RespawnResult<()> {
    let mut supervisor = ProcessSupervisor::new(config.child_command());
    let mut coordinator = RestartCoordinator::new();

    let (tx, rx) = channel();
    let mut watcher = FileWatcher::new(tx)?;

    let mut pid = supervisor.start()?;
    coordinator.on_child_started();
    on_event(ServerEvent::Started { pid });

    refresh_watch_set(config, &mut watcher, &on_event);

    while running.load(Ordering::SeqCst) {
        if let Some(path) = next_change(&rx) {
            on_event(ServerEvent::FileChanged {
                path: path.display().to_string(),
            });
            if supervisor.child_pid().is_none() {
                // an earlier relaunch failed; a fresh change retries the
                // spawn instead of killing a child that does not exist
                relaunch(
                    config,
                    &mut supervisor,
                    &mut coordinator,
                    &mut watcher,
                    &mut pid,
                    &on_event,
                );
            } else {
                match coordinator.on_change() {
                    ChangeDecision::RestartNow => {
                        on_event(ServerEvent::Restarting);
                        supervisor.kill();
                    }
                    ChangeDecision::Deferred => on_event(ServerEvent::RestartQueued),
                }
            }
        }

        if let Some(status) = supervisor.poll_exit()? {
            let expected = coordinator.on_child_exit() == ExitKind::Requested;
            on_event(ServerEvent::ChildExited {
                pid,
                code: status.code(),
                expected,
            });

            // unconditional relaunch: crash exits and requested kills take
            // the same path, with no backoff and no attempt cap
            relaunch(
                config,
                &mut supervisor,
                &mut coordinator,
                &mut watcher,
                &mut pid,
                &on_event,
            );
        }
    }

    supervisor.shutdown();
    on_event(ServerEvent::Shutdown);
    Ok(())
}

/// Spawn a fresh child. A failure never leaves `run`: it is reported as an
/// event, the coordinator drops back to idle, and the next change signal
/// tries again. The supervisor only stops on external shutdown.
fn relaunch(
    config: &Config,
    supervisor: &mut ProcessSupervisor,
    coordinator: &mut RestartCoordinator,
    watcher: &mut FileWatcher,
    pid: &mut u32,
    on_event: &impl Fn(ServerEvent),
) {
    match supervisor.start() {
        Ok(new_pid) => {
            *pid = new_pid;
            on_event(ServerEvent::Started { pid: new_pid });

            // later passes may discover new files; the watch set only grows
            refresh_watch_set(config, watcher, on_event);

            if coordinator.on_child_started() {
                on_event(ServerEvent::Restarting);
                supervisor.kill();
            }
        }
        Err(e) => {
            coordinator.on_spawn_failed();
            on_event(ServerEvent::SpawnFailed {
                message: e.to_string(),
            });
        }
    }
}

/// Pull one change signal without blocking the exit poll for long.
fn next_change(rx: &Receiver<PathBuf>) -> Option<PathBuf> {
    rx.recv_timeout(Duration::from_millis(TICK_MS)).ok()
}

/// Enumerate and subscribe. Failures are fatal for watch setup only: they
/// are reported and the already-running child continues unsupervised.
fn refresh_watch_set(config: &Config, watcher: &mut FileWatcher, on_event: &impl Fn(ServerEvent)) {
    let enumeration = match enumerate_files(&config.root, &config.patterns) {
        Ok(enumeration) => enumeration,
        Err(e) => {
            on_event(ServerEvent::WatchSetupFailed {
                message: e.to_string(),
            });
            return;
        }
    };

    for path in &enumeration.skipped {
        on_event(ServerEvent::SkippedPath {
            path: path.display().to_string(),
        });
    }

    for path in &enumeration.files {
        match watcher.watch_file(path) {
            Ok(_) => {}
            Err(e) => {
                on_event(ServerEvent::WatchSetupFailed {
                    message: e.to_string(),
                });
                return;
            }
        }
    }

    on_event(ServerEvent::Watching {
        files: watcher.watched_count(),
    });
}
