//! Respawn - development-mode process supervisor
//!
//! Respawn runs a target application as a child process, watches source
//! files matching a set of glob patterns, and restarts the child whenever a
//! watched file changes. Bursts of edits collapse into at most one queued
//! follow-up restart; restarts are never issued concurrently.

pub mod config;
pub mod coordinator;
pub mod enumerator;
pub mod error;
pub mod server;
pub mod supervisor;
pub mod watcher;

// Re-exports for convenience
pub use config::{parse_pattern_list, ChildCommand, Config, DEFAULT_PATTERNS};
pub use coordinator::{ChangeDecision, ExitKind, RestartCoordinator, SupervisorState};
pub use enumerator::{enumerate_files, Enumeration};
pub use error::{RespawnError, RespawnResult};
pub use server::{run, ServerEvent};
pub use supervisor::ProcessSupervisor;
pub use watcher::FileWatcher;
