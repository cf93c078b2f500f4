use std::path::PathBuf;

use clap::Parser;

/// Respawn - development-mode process supervisor
///
/// Runs your application and restarts it whenever a watched source file
/// changes. The child's output passes straight through.
#[derive(Parser, Debug)]
#[command(name = "respawn")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Example: respawn --main-file code/web/main.js --mute")]
pub struct Cli {
    /// Path to the application entry point to run as the child
    #[arg(long)]
    pub main_file: PathBuf,

    /// Optional interpreter invoked with the main file as its argument
    #[arg(long = "coffee-script")]
    pub coffee_script: Option<PathBuf>,

    /// Glob patterns to watch: ['*.js', '*.coffee'] or *.js,*.coffee
    #[arg(long)]
    pub files_to_watch: Option<String>,

    /// Root directory the patterns are matched under
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Suppress skipped-path warnings and informational restart logging
    #[arg(long)]
    pub mute: bool,

    /// NDJSON event output for CI
    #[arg(long)]
    pub json: bool,
}
