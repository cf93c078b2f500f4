//! Process supervision
//!
//! Owns the single live child process. The supervisor only spawns, signals
//! and polls; when to do which is the coordinator's decision, made in the
//! server loop. Child stdout/stderr are inherited so output passes straight
//! through; stdin is closed so the child never contends for the terminal.

use std::process::{Child, Command, ExitStatus, Stdio};

use crate::config::ChildCommand;
use crate::error::{RespawnError, RespawnResult};

/// The currently running child: its handle and OS process identifier
#[derive(Debug)]
pub struct ChildHandle {
    child: Child,
    pid: u32,
}

/// Spawns, signals and reaps the configured child command
#[derive(Debug)]
pub struct ProcessSupervisor {
    command: ChildCommand,
    child: Option<ChildHandle>,
}

impl ProcessSupervisor {
    pub fn new(command: ChildCommand) -> Self {
        Self {
            command,
            child: None,
        }
    }

    /// Spawn the child and store its handle. Returns the new pid.
    pub fn start(&mut self) -> RespawnResult<u32> {
        let child = Command::new(&self.command.program)
            .args(&self.command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| RespawnError::Spawn {
                command: self.command.display(),
                source,
            })?;

        let pid = child.id();
        self.child = Some(ChildHandle { child, pid });
        Ok(pid)
    }

    /// Send the termination signal to the current child. Never spawns;
    /// the relaunch happens only after [`poll_exit`](Self::poll_exit)
    /// observes the exit.
    pub fn kill(&mut self) {
        if let Some(handle) = self.child.as_mut() {
            // a kill racing the exit is a no-op; the exit poll picks it up
            let _ = handle.child.kill();
        }
    }

    /// Non-blocking exit check. On exit the handle is cleared (it stays
    /// empty only for the kill→exit→respawn window) and the status returned.
    pub fn poll_exit(&mut self) -> RespawnResult<Option<ExitStatus>> {
        let Some(handle) = self.child.as_mut() else {
            return Ok(None);
        };
        match handle.child.try_wait()? {
            Some(status) => {
                self.child = None;
                Ok(Some(status))
            }
            None => Ok(None),
        }
    }

    /// Pid of the live child, if any.
    pub fn child_pid(&self) -> Option<u32> {
        self.child.as_ref().map(|handle| handle.pid)
    }

    /// Kill the child and block until the OS reaps it. Shutdown only; the
    /// event loop itself never blocks here.
    pub fn shutdown(&mut self) {
        if let Some(mut handle) = self.child.take() {
            let _ = handle.child.kill();
            let _ = handle.child.wait();
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::thread;
    use std::time::{Duration, Instant};

    fn command(program: &str, args: &[&str]) -> ChildCommand {
        ChildCommand {
            program: PathBuf::from(program),
            args: args.iter().map(PathBuf::from).collect(),
        }
    }

    /// Poll until the child exits or the deadline passes.
    fn wait_for_exit(supervisor: &mut ProcessSupervisor) -> Option<ExitStatus> {
        let deadline = Instant::now() + Duration::from_secs(10);
        while Instant::now() < deadline {
            if let Some(status) = supervisor.poll_exit().unwrap() {
                return Some(status);
            }
            thread::sleep(Duration::from_millis(20));
        }
        None
    }

    #[test]
    fn start_stores_handle_and_pid() {
        let mut supervisor = ProcessSupervisor::new(command("sleep", &["30"]));
        let pid = supervisor.start().unwrap();
        assert_eq!(supervisor.child_pid(), Some(pid));
        assert!(supervisor.poll_exit().unwrap().is_none());
        supervisor.shutdown();
    }

    #[test]
    fn spawn_failure_is_reported_with_the_command() {
        let mut supervisor =
            ProcessSupervisor::new(command("/nonexistent/interpreter", &["main.js"]));
        let err = supervisor.start().unwrap_err();
        assert!(err
            .to_string()
            .contains("failed to spawn '/nonexistent/interpreter main.js'"));
        assert_eq!(supervisor.child_pid(), None);
    }

    #[test]
    fn kill_then_poll_observes_exit_and_clears_handle() {
        let mut supervisor = ProcessSupervisor::new(command("sleep", &["30"]));
        supervisor.start().unwrap();

        supervisor.kill();
        let status = wait_for_exit(&mut supervisor).expect("child should exit after kill");
        assert!(!status.success());
        assert_eq!(supervisor.child_pid(), None);
    }

    #[test]
    fn self_exit_is_observed_by_polling() {
        let mut supervisor = ProcessSupervisor::new(command("true", &[]));
        supervisor.start().unwrap();

        let status = wait_for_exit(&mut supervisor).expect("child should exit on its own");
        assert!(status.success());
        assert_eq!(supervisor.child_pid(), None);
    }

    #[test]
    fn kill_after_exit_is_a_noop() {
        let mut supervisor = ProcessSupervisor::new(command("true", &[]));
        supervisor.start().unwrap();
        wait_for_exit(&mut supervisor).unwrap();

        // no child left; must not panic or error
        supervisor.kill();
        assert!(supervisor.poll_exit().unwrap().is_none());
    }

    #[test]
    fn restart_cycle_yields_a_fresh_pid() {
        let mut supervisor = ProcessSupervisor::new(command("sleep", &["30"]));
        let first = supervisor.start().unwrap();

        supervisor.kill();
        wait_for_exit(&mut supervisor).unwrap();

        let second = supervisor.start().unwrap();
        assert_ne!(first, second);
        supervisor.shutdown();
    }
}
