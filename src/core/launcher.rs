//! # Launcher
//!
//! Opens a selected file with an external program chosen by extension.
//!
//! Lookup order: user `[[programs]]` rules, then the built-in table, then
//! the editor for any other regular file. Programs that need a terminal are
//! wrapped as `<terminal> <terminal_args..> <program> <args..> <file>`.
//!
//! Children start in their own process group with null stdio, so a viewer
//! outlives the picker and never reads its keys. A detached thread waits on
//! each child so finished viewers do not linger as zombies.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};

use log::{debug, info, warn};

use super::config::ResolvedConfig;
use super::error::PickerError;

/// How to open one kind of file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramRule {
    pub program: String,
    pub args: Vec<String>,
    pub needs_terminal: bool,
}

impl ProgramRule {
    fn new(program: &str, args: &[&str], needs_terminal: bool) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            needs_terminal,
        }
    }
}

/// Placeholder program name the built-in table uses for the editor.
const EDITOR: &str = "$EDITOR";

/// Built-in extension table. `ext` is lowercase, without the dot.
pub fn builtin_rule(ext: &str) -> Option<ProgramRule> {
    let rule = match ext {
        "pdf" => ProgramRule::new("mupdf", &["-A", "8"], false),
        "aif" | "avi" | "cda" | "mid" | "midi" | "mkv" | "mov" | "mp3" | "mp4" | "mpg"
        | "mpeg" | "ogg" | "wav" | "wma" | "wmv" => ProgramRule::new("gorum", &[], false),
        "doc" | "docx" | "odt" | "ppt" | "pptx" | "rtf" | "xls" | "xlsx" => {
            ProgramRule::new("soffice", &[], false)
        }
        "txt" | "c" | "conf" | "cpp" | "css" | "go" | "h" | "htm" | "html" | "ini" | "js"
        | "json" | "log" | "md" | "php" | "pl" | "py" | "rb" | "sh" | "sql" | "tmp" | "yaml"
        | "yml" | "vim" | "xhtml" | "xml" => ProgramRule::new(EDITOR, &[], true),
        "bmp" | "gif" | "ico" | "jpg" | "jpeg" | "png" | "svg" | "tif" | "tiff" => {
            ProgramRule::new("geeqie", &[], false)
        }
        _ => return None,
    };
    Some(rule)
}

/// Lowercased extension of `path`, without the dot.
fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}

/// Pick the program rule for `path`.
pub fn resolve_program(path: &Path, config: &ResolvedConfig) -> Result<ProgramRule, PickerError> {
    let meta = match fs::metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(PickerError::NotFound(path.to_path_buf()));
        }
        Err(e) => return Err(PickerError::Io(e)),
    };

    let ext = extension_of(path);
    let configured = ext.as_deref().and_then(|ext| {
        config
            .programs
            .iter()
            .find(|entry| entry.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .map(|entry| ProgramRule {
                program: entry.program.clone(),
                args: entry.args.clone(),
                needs_terminal: entry.needs_terminal,
            })
    });

    let rule = match configured.or_else(|| ext.as_deref().and_then(builtin_rule)) {
        Some(rule) => rule,
        None if meta.is_file() => ProgramRule::new(EDITOR, &[], true),
        None => {
            let shown = ext.map(|e| format!(".{e}")).unwrap_or_default();
            return Err(PickerError::UnsupportedFormat(shown));
        }
    };

    if rule.program == EDITOR {
        return Ok(ProgramRule {
            program: config.editor.clone(),
            ..rule
        });
    }
    Ok(rule)
}

/// Full command line (program first) for opening `path` with `rule`.
/// The path is passed through as raw bytes.
pub fn command_line(rule: &ProgramRule, path: &Path, config: &ResolvedConfig) -> Vec<OsString> {
    let mut argv: Vec<OsString> = Vec::new();
    if rule.needs_terminal {
        argv.push(config.terminal.clone().into());
        argv.extend(config.terminal_args.iter().map(OsString::from));
    }
    argv.push(rule.program.clone().into());
    argv.extend(rule.args.iter().map(OsString::from));
    argv.push(path.as_os_str().to_owned());
    argv
}

/// Opens files on behalf of the navigation loop.
pub trait Launcher {
    /// Start a viewer for `path` with `cwd` as its working directory.
    fn open(&mut self, path: &Path, cwd: &Path) -> Result<(), PickerError>;
}

/// Launcher that spawns real processes.
pub struct ProgramLauncher {
    config: ResolvedConfig,
}

impl ProgramLauncher {
    pub fn new(config: ResolvedConfig) -> Self {
        Self { config }
    }
}

impl Launcher for ProgramLauncher {
    fn open(&mut self, path: &Path, cwd: &Path) -> Result<(), PickerError> {
        let rule = resolve_program(path, &self.config)?;
        let argv = command_line(&rule, path, &self.config);
        debug!("Spawning {:?} in {}", argv, cwd.display());

        let program = argv[0].to_string_lossy().into_owned();
        let child = Command::new(&argv[0])
            .args(&argv[1..])
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .process_group(0)
            .spawn()
            .map_err(|source| PickerError::Spawn {
                program: program.clone(),
                source,
            })?;

        info!("Opened {} with {} (pid {})", path.display(), program, child.id());
        reap(child);
        Ok(())
    }
}

/// Wait for `child` on a background thread without blocking the caller.
fn reap(mut child: Child) -> Option<JoinHandle<Option<ExitStatus>>> {
    let pid = child.id();
    let spawned = thread::Builder::new()
        .name(format!("reap-{pid}"))
        .spawn(move || match child.wait() {
            Ok(status) => {
                debug!("Child {} exited with {}", pid, status);
                Some(status)
            }
            Err(e) => {
                warn!("Failed to wait for child {}: {}", pid, e);
                None
            }
        });
    match spawned {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Could not start reaper for child {}: {}", pid, e);
            None
        }
    }
}
