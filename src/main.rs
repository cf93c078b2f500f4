//! Respawn CLI - development-mode process supervisor
//!
//! Usage: respawn --main-file <path> [--coffee-script <path>]
//!                [--files-to-watch <list>] [--root <dir>] [--mute] [--json]
//!
//! Runs the main file as a child process (through the interpreter when one
//! is given), watches the matching source files, and restarts the child on
//! every change until interrupted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use respawn::{run, Config};

mod cli;
mod ui;

use cli::Cli;
use ui::Ui;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::new(
        cli.main_file,
        cli.coffee_script,
        cli.files_to_watch.as_deref(),
        cli.root,
        cli.mute,
    )
    .context("invalid configuration")?;

    // Ctrl+C flips the running flag; the server loop notices within a tick
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .context("failed to set Ctrl+C handler")?;

    let json = cli.json;
    let mute = config.mute;
    let ui = Ui::new(mute);

    run(&config, running, |event| {
        if json {
            // mute applies to the NDJSON stream too; errors always pass
            if !(mute && event.is_informational()) {
                println!("{}", event.to_json());
            }
        } else {
            ui.render(&event);
        }
    })?;

    Ok(())
}
