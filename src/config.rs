//! Runtime configuration
//!
//! Everything the supervisor needs is resolved here once, at startup:
//! the child command, the glob patterns to watch, and the mute flag.
//! The `--files-to-watch` value is parsed with a strict list parser;
//! it is never evaluated.

use std::path::PathBuf;

use crate::error::{RespawnError, RespawnResult};

/// Patterns watched when `--files-to-watch` is not given: the primary
/// source extension plus the transpiled-source extension.
pub const DEFAULT_PATTERNS: &[&str] = &["*.js", "*.coffee"];

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Application entry point run as the child
    pub main_file: PathBuf,
    /// Optional interpreter invoked with the main file as its argument
    pub interpreter: Option<PathBuf>,
    /// Glob patterns selecting the files to watch
    pub patterns: Vec<String>,
    /// Root directory the patterns are matched under
    pub root: PathBuf,
    /// Suppress skipped-path warnings and informational restart logging
    pub mute: bool,
}

impl Config {
    /// Build a validated configuration.
    ///
    /// `files_to_watch` is the raw `--files-to-watch` value; `None` falls
    /// back to [`DEFAULT_PATTERNS`].
    pub fn new(
        main_file: PathBuf,
        interpreter: Option<PathBuf>,
        files_to_watch: Option<&str>,
        root: PathBuf,
        mute: bool,
    ) -> RespawnResult<Self> {
        if !main_file.is_file() {
            return Err(RespawnError::MainFileNotFound { path: main_file });
        }

        let patterns = match files_to_watch {
            Some(raw) => parse_pattern_list(raw)?,
            None => DEFAULT_PATTERNS.iter().map(|p| p.to_string()).collect(),
        };

        Ok(Self {
            main_file,
            interpreter,
            patterns,
            root,
            mute,
        })
    }

    /// Resolve the command the supervisor spawns.
    pub fn child_command(&self) -> ChildCommand {
        match &self.interpreter {
            Some(interpreter) => ChildCommand {
                program: interpreter.clone(),
                args: vec![self.main_file.clone()],
            },
            None => ChildCommand {
                program: self.main_file.clone(),
                args: vec![],
            },
        }
    }
}

/// The resolved child invocation: program plus argument list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildCommand {
    pub program: PathBuf,
    pub args: Vec<PathBuf>,
}

impl ChildCommand {
    /// Human-readable form for log and error messages.
    pub fn display(&self) -> String {
        let mut out = self.program.display().to_string();
        for arg in &self.args {
            out.push(' ');
            out.push_str(&arg.display().to_string());
        }
        out
    }
}

/// Parse a `--files-to-watch` value into glob patterns.
///
/// Two forms are accepted:
/// - a bracketed quoted list: `['*.js', "*.coffee"]`
/// - a bare comma-separated list: `*.js,*.coffee`
///
/// Anything else is a configuration error. This is a plain syntax parser;
/// the input is never executed or expanded.
pub fn parse_pattern_list(input: &str) -> RespawnResult<Vec<String>> {
    let trimmed = input.trim();

    let err = |message: &str| RespawnError::InvalidPatternList {
        input: input.to_string(),
        message: message.to_string(),
    };

    if trimmed.is_empty() {
        return Err(err("empty pattern list"));
    }

    let (inner, quoted) = if let Some(rest) = trimmed.strip_prefix('[') {
        let inner = rest
            .strip_suffix(']')
            .ok_or_else(|| err("missing closing ']'"))?;
        (inner, true)
    } else if trimmed.ends_with(']') {
        return Err(err("missing opening '['"));
    } else {
        (trimmed, false)
    };

    let mut patterns = Vec::new();
    for item in inner.split(',') {
        let item = item.trim();
        if item.is_empty() {
            return Err(err("empty pattern in list"));
        }

        let pattern = if quoted {
            unquote(item).ok_or_else(|| err("list items must be quoted, e.g. ['*.js']"))?
        } else {
            if item.starts_with('\'') || item.starts_with('"') {
                return Err(err("quotes are only valid inside a bracketed list"));
            }
            item
        };

        if pattern.is_empty() {
            return Err(err("empty pattern in list"));
        }
        patterns.push(pattern.to_string());
    }

    Ok(patterns)
}

/// Strip one pair of matching quotes; `None` if the item is not quoted.
fn unquote(item: &str) -> Option<&str> {
    let mut chars = item.chars();
    let first = chars.next()?;
    if (first == '\'' || first == '"') && item.len() >= 2 && item.ends_with(first) {
        let inner = &item[1..item.len() - 1];
        // a stray quote inside would mean mismatched quoting
        if inner.contains(first) {
            return None;
        }
        Some(inner)
    } else {
        None
    }
}
