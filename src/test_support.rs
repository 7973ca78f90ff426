//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use crate::core::PickerError;
use crate::core::key::KEY_SIZE;
use crate::core::launcher::Launcher;
use crate::tui::terminal::{CursorGateway, KeySource, ScreenGateway};

/// In-memory terminal that keeps a virtual screen of text rows.
pub struct RecordingTerminal {
    pub rows: u16,
    pub cols: u16,
    pub screen: Vec<String>,
    /// `(row, col)`, 1-based.
    pub cursor: (u16, u16),
    pub clears: usize,
}

impl RecordingTerminal {
    pub fn new(rows: u16, cols: u16) -> Self {
        Self {
            rows,
            cols,
            screen: vec![String::new(); usize::from(rows)],
            cursor: (1, 1),
            clears: 0,
        }
    }

    /// Text on a 1-based row.
    pub fn line(&self, row: u16) -> &str {
        self.screen
            .get(usize::from(row) - 1)
            .map(String::as_str)
            .unwrap_or("")
    }

    fn line_mut(&mut self, row: u16) -> &mut String {
        let index = usize::from(row.max(1)) - 1;
        if self.screen.len() <= index {
            self.screen.resize(index + 1, String::new());
        }
        &mut self.screen[index]
    }
}

impl ScreenGateway for RecordingTerminal {
    fn clear(&mut self) -> Result<(), PickerError> {
        self.screen = vec![String::new(); usize::from(self.rows)];
        self.cursor = (1, 1);
        self.clears += 1;
        Ok(())
    }

    fn size(&mut self) -> Result<(u16, u16), PickerError> {
        Ok((self.rows, self.cols))
    }

    fn print(&mut self, text: &str) -> Result<(), PickerError> {
        let (row, col) = self.cursor;
        let start = usize::from(col.max(1)) - 1;
        let line = self.line_mut(row);
        let mut chars: Vec<char> = line.chars().collect();
        if chars.len() < start {
            chars.resize(start, ' ');
        }
        for (i, c) in text.chars().enumerate() {
            match chars.get_mut(start + i) {
                Some(slot) => *slot = c,
                None => chars.push(c),
            }
        }
        *line = chars.into_iter().collect();
        self.cursor.1 = col + text.chars().count() as u16;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), PickerError> {
        Ok(())
    }
}

impl CursorGateway for RecordingTerminal {
    fn move_to(&mut self, row: u16, col: u16) -> Result<(), PickerError> {
        self.cursor = (row, col);
        Ok(())
    }

    fn clear_line(&mut self) -> Result<(), PickerError> {
        let (row, col) = self.cursor;
        let keep = usize::from(col.max(1)) - 1;
        let line = self.line_mut(row);
        *line = line.chars().take(keep).collect();
        Ok(())
    }

    fn reset_modes(&mut self) -> Result<(), PickerError> {
        Ok(())
    }
}

/// Replays a fixed key script, then presses Escape forever.
pub struct ScriptedKeys {
    keys: VecDeque<[u8; KEY_SIZE]>,
    pub enters_awaited: usize,
}

impl ScriptedKeys {
    pub fn new(keys: &[[u8; KEY_SIZE]]) -> Self {
        Self {
            keys: keys.iter().copied().collect(),
            enters_awaited: 0,
        }
    }

    /// Script of single-byte keys, e.g. `"jjl"`.
    pub fn chars(script: &str) -> Self {
        let keys: Vec<_> = script.bytes().map(|b| [b, 0, 0]).collect();
        Self::new(&keys)
    }
}

impl KeySource for ScriptedKeys {
    fn read_key(&mut self) -> Result<[u8; KEY_SIZE], PickerError> {
        Ok(self.keys.pop_front().unwrap_or([27, 0, 0]))
    }

    fn wait_for_enter(&mut self) -> Result<(), PickerError> {
        self.enters_awaited += 1;
        Ok(())
    }
}

/// Launcher that records what it was asked to open.
#[derive(Default)]
pub struct RecordingLauncher {
    pub opened: Vec<PathBuf>,
    pub fail: bool,
}

impl Launcher for RecordingLauncher {
    fn open(&mut self, path: &Path, _cwd: &Path) -> Result<(), PickerError> {
        if self.fail {
            return Err(PickerError::UnsupportedFormat(".bin".to_string()));
        }
        self.opened.push(path.to_path_buf());
        Ok(())
    }
}

/// Scratch directory under the system temp dir, removed on drop.
pub struct TempTree {
    root: PathBuf,
}

impl TempTree {
    pub fn new() -> Self {
        let root = std::env::temp_dir().join(format!("sf-test-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&root).unwrap();
        Self { root }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.root.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.write(name, "")
    }

    pub fn executable(&self, name: &str) -> PathBuf {
        let path = self.file(name);
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    pub fn dir(&self, name: &str) -> PathBuf {
        let path = self.root.join(name);
        fs::create_dir_all(&path).unwrap();
        path
    }
}

impl Drop for TempTree {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}
