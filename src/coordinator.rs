//! Restart coordination
//!
//! Pure state machine deciding, for each change signal, whether to kill the
//! child now or queue a pending restart. However many signals arrive while a
//! restart is in flight, at most one follow-up restart is queued; restarts
//! are strictly serialized. The caller (the server loop) is the single
//! consumer of every event, so no locking is involved.

/// Supervisor lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    /// No child running yet
    Idle,
    /// Child alive, normal operation
    Running,
    /// Kill issued, awaiting the OS exit confirmation
    Restarting,
}

/// What to do with a change signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeDecision {
    /// Kill the child now; a relaunch follows its exit
    RestartNow,
    /// A restart is already in flight; the signal was latched
    Deferred,
}

/// How an observed child exit is classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitKind {
    /// The exit we asked for
    Requested,
    /// The child terminated on its own; still relaunched
    Unexpected,
}

/// Debounce/latch state machine for restart decisions
#[derive(Debug)]
pub struct RestartCoordinator {
    state: SupervisorState,
    pending_restart: bool,
}

impl RestartCoordinator {
    pub fn new() -> Self {
        Self {
            state: SupervisorState::Idle,
            pending_restart: false,
        }
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    /// True while a change signal is latched for a follow-up restart.
    pub fn restart_pending(&self) -> bool {
        self.pending_restart
    }

    /// A watched file changed.
    pub fn on_change(&mut self) -> ChangeDecision {
        match self.state {
            SupervisorState::Idle | SupervisorState::Running => {
                self.state = SupervisorState::Restarting;
                ChangeDecision::RestartNow
            }
            SupervisorState::Restarting => {
                self.pending_restart = true;
                ChangeDecision::Deferred
            }
        }
    }

    /// The OS confirmed a child exit. Every exit is followed by a relaunch;
    /// this only classifies whether anyone asked for it.
    pub fn on_child_exit(&mut self) -> ExitKind {
        match self.state {
            SupervisorState::Restarting => ExitKind::Requested,
            _ => ExitKind::Unexpected,
        }
    }

    /// A relaunch attempt failed; there is no child. Drop back to `Idle`
    /// and clear the latch: whatever spawn eventually succeeds runs the
    /// newest code, so every latched change is already satisfied by it.
    pub fn on_spawn_failed(&mut self) {
        self.state = SupervisorState::Idle;
        self.pending_restart = false;
    }

    /// A child was (re)launched. Returns `true` when a latched change
    /// requires one follow-up restart; the latch is cleared and the state
    /// moves straight back to `Restarting` so the caller kills the fresh
    /// child immediately.
    pub fn on_child_started(&mut self) -> bool {
        self.state = SupervisorState::Running;
        if self.pending_restart {
            self.pending_restart = false;
            self.state = SupervisorState::Restarting;
            true
        } else {
            false
        }
    }
}

impl Default for RestartCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
