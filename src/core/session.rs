//! # Session
//!
//! Where the picker is and where it was. The process working directory is
//! never changed; every path the loop hands out is absolute.

use std::path::{Path, PathBuf};

use log::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    cwd: PathBuf,
    previous: Option<PathBuf>,
}

impl Session {
    pub fn new(start: PathBuf) -> Self {
        Self {
            cwd: start,
            previous: None,
        }
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn previous(&self) -> Option<&Path> {
        self.previous.as_deref()
    }

    /// Switch to `dir`, remembering the current directory as previous.
    /// Re-entering the current directory keeps the recorded previous one.
    pub fn change_to(&mut self, dir: PathBuf) {
        if dir == self.cwd {
            return;
        }
        debug!("cd {} -> {}", self.cwd.display(), dir.display());
        self.previous = Some(std::mem::replace(&mut self.cwd, dir));
    }

    /// Parent of the current directory, unless already at the root.
    pub fn parent(&self) -> Option<PathBuf> {
        self.cwd.parent().map(Path::to_path_buf)
    }

    /// Previously visited directory, if one is recorded and differs from the current one.
    pub fn back_target(&self) -> Option<PathBuf> {
        self.previous
            .as_ref()
            .filter(|prev| **prev != self.cwd)
            .cloned()
    }
}
