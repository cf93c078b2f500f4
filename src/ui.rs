use crossterm::style::Stylize;
use is_terminal::IsTerminal;

use respawn::ServerEvent;

/// Terminal renderer for server events.
///
/// Status lines go to stderr so the child's stdout stays clean; color only
/// when stderr is a real terminal.
pub struct Ui {
    mute: bool,
    color: bool,
}

impl Ui {
    pub fn new(mute: bool) -> Self {
        Self {
            mute,
            color: std::io::stderr().is_terminal(),
        }
    }

    #[cfg(test)]
    fn plain(mute: bool) -> Self {
        Self { mute, color: false }
    }

    pub fn render(&self, event: &ServerEvent) {
        if self.mute && event.is_informational() {
            return;
        }
        if let Some(line) = self.format(event) {
            eprintln!("{line}");
        }
    }

    fn format(&self, event: &ServerEvent) -> Option<String> {
        let prefix = if self.color {
            "[respawn]".dark_grey().to_string()
        } else {
            "[respawn]".to_string()
        };

        let body = match event {
            ServerEvent::Started { pid } => format!("started child (pid {pid})"),
            ServerEvent::Watching { files } => format!("watching {files} files"),
            ServerEvent::SkippedPath { path } => {
                let msg = format!("skipping unsupported path \"{path}\"");
                if self.color {
                    msg.yellow().to_string()
                } else {
                    msg
                }
            }
            ServerEvent::FileChanged { path } => format!("file changed: {path}"),
            ServerEvent::Restarting => "restarting".to_string(),
            ServerEvent::RestartQueued => "change during restart, queuing one more".to_string(),
            ServerEvent::ChildExited {
                pid,
                code,
                expected,
            } => {
                if *expected {
                    // the exit we asked for; the relaunch line follows
                    return None;
                }
                let code = code.map_or("signal".to_string(), |c| c.to_string());
                let msg = format!("child (pid {pid}) exited unexpectedly ({code}), relaunching");
                if self.color {
                    msg.red().to_string()
                } else {
                    msg
                }
            }
            ServerEvent::SpawnFailed { message } => {
                let msg = format!("{message}; waiting for a change to retry");
                if self.color {
                    msg.red().to_string()
                } else {
                    msg
                }
            }
            ServerEvent::WatchSetupFailed { message } => {
                let msg = format!("watch setup failed: {message}");
                if self.color {
                    msg.red().to_string()
                } else {
                    msg
                }
            }
            ServerEvent::Shutdown => "shutting down".to_string(),
        };

        Some(format!("{prefix} {body}"))
    }
}
