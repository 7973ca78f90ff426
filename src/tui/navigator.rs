//! # Navigation Loop
//!
//! Read key → decode → dispatch → redraw, until Escape.
//!
//! ```text
//!            ┌──────────── key ────────────┐
//!            ▼                             │
//!       ┌─────────┐  '.' '-' '~' '_' r  ┌───────────────────┐
//!       │ Listing │ ──────────────────► │ ChangingDirectory │──┐
//!       └─────────┘                     └───────────────────┘  │ reload
//!        │  ▲   │ enter on a file       ┌───────────────────┐  │
//!        │  │   └─────────────────────► │    OpeningFile    │  │
//!        │  └────────────────────────── └───────────────────┘  │
//!        │  ◄───────────────────────────────────────────────────┘
//!        │ escape
//!        ▼
//!    Exiting
//! ```
//!
//! Failures while opening a file are shown on the status line. Everything
//! else (directory reads, terminal queries, key reads) ends the session.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use super::pager::Pager;
use super::terminal::{KeySource, Terminal};
use crate::core::PickerError;
use crate::core::key::{self, KeyName};
use crate::core::launcher::Launcher;
use crate::core::layout::ViewportGeometry;
use crate::core::listing::{read_listing, resolves_to_dir};
use crate::core::session::Session;

/// What the loop does after handling one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopState {
    Listing,
    ChangingDirectory(PathBuf),
    OpeningFile(PathBuf),
    Exiting,
}

const HELP: &[&str] = &[
    "# help",
    ".       # lists the current directory contents",
    "-       # changes to parent directory",
    "_       # changes to previous directory [^,p]",
    "~       # changes to home user directory",
    "h       # goes to previous page [left]",
    "l       # goes to next page [right]",
    "j       # goes one line downward [down]",
    "k       # goes one line upward [up]",
    "J       # goes to bottom line [shift-down]",
    "K       # goes to top line [shift-up]",
    "r       # redraws terminal screen",
    "Enter   # selects the file or directory [v]",
    "Escape  # exits sf",
    "?       # shows sf' help information",
];

const HELP_PROMPT: &str = "Press ENTER to continue";

/// Help lines split into screens of `rows`, leaving the last row of each
/// screen for the prompt.
fn help_pages(rows: u16) -> std::slice::Chunks<'static, &'static str> {
    let per_page = usize::from(rows.saturating_sub(1)).max(1);
    HELP.chunks(per_page)
}

pub struct Navigator<T, K, L> {
    term: T,
    keys: K,
    launcher: L,
    session: Session,
}

impl<T: Terminal, K: KeySource, L: Launcher> Navigator<T, K, L> {
    pub fn new(term: T, keys: K, launcher: L, session: Session) -> Self {
        Self {
            term,
            keys,
            launcher,
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn terminal(&self) -> &T {
        &self.term
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    pub fn keys(&self) -> &K {
        &self.keys
    }

    /// Run until Escape or a fatal error.
    pub fn run(&mut self) -> Result<(), PickerError> {
        let mut pager = self.load_directory()?;
        loop {
            let bytes = self.keys.read_key()?;
            let key = key::decode(&bytes)?;
            debug!("Key: {}", key);

            match self.dispatch(&mut pager, &key)? {
                LoopState::Listing => {}
                LoopState::ChangingDirectory(dir) => {
                    self.session.change_to(dir);
                    pager = self.load_directory()?;
                }
                LoopState::OpeningFile(path) => self.open_file(&mut pager, &path)?,
                LoopState::Exiting => {
                    info!("Leaving {}", self.session.cwd().display());
                    return Ok(());
                }
            }
        }
    }

    /// Read the session directory and draw its first page.
    fn load_directory(&mut self) -> Result<Pager, PickerError> {
        let listing = read_listing(self.session.cwd())?;
        let (rows, cols) = self.term.size()?;
        let pager = Pager::new(listing, ViewportGeometry::new(rows, cols))?;
        info!(
            "Listing {} ({} entries, {} pages, {}x{})",
            self.session.cwd().display(),
            pager.listing().len(),
            pager.pages(),
            rows,
            cols
        );
        pager.draw(&mut self.term)?;
        Ok(pager)
    }

    /// Apply one key to the pager, returning the next loop state.
    pub fn dispatch(&mut self, pager: &mut Pager, key: &KeyName) -> Result<LoopState, PickerError> {
        let next = match key {
            KeyName::Escape => LoopState::Exiting,
            KeyName::Char('?') => {
                self.show_help(pager)?;
                LoopState::Listing
            }
            KeyName::Char('.') | KeyName::Char('r') => {
                LoopState::ChangingDirectory(self.session.cwd().to_path_buf())
            }
            KeyName::Char('-') => match self.session.parent() {
                Some(parent) => LoopState::ChangingDirectory(parent),
                None => LoopState::Listing,
            },
            KeyName::Char('~') => match dirs::home_dir() {
                Some(home) => LoopState::ChangingDirectory(home),
                None => {
                    warn!("Home directory could not be determined");
                    let message = "# error: home directory could not be determined";
                    pager.show_status(&mut self.term, message)?;
                    LoopState::Listing
                }
            },
            KeyName::Char('_') | KeyName::Char('^') | KeyName::Char('p') => {
                match self.session.back_target() {
                    Some(prev) => LoopState::ChangingDirectory(prev),
                    None => LoopState::Listing,
                }
            }
            KeyName::Char('j') | KeyName::Down => {
                pager.advance_line(&mut self.term)?;
                LoopState::Listing
            }
            KeyName::Char('k') | KeyName::Up => {
                pager.retreat_line(&mut self.term)?;
                LoopState::Listing
            }
            KeyName::Char('J') | KeyName::ShiftDown => {
                pager.jump_bottom(&mut self.term)?;
                LoopState::Listing
            }
            KeyName::Char('K') | KeyName::ShiftUp => {
                pager.jump_top(&mut self.term)?;
                LoopState::Listing
            }
            KeyName::Char('h') | KeyName::Left => {
                if pager.pages() > 1 {
                    pager.retreat_page(&mut self.term, true)?;
                }
                LoopState::Listing
            }
            KeyName::Char('l') | KeyName::Right => {
                if pager.pages() > 1 {
                    pager.advance_page(&mut self.term)?;
                }
                LoopState::Listing
            }
            // '\r' is Enter while the terminal is in raw mode
            KeyName::Enter | KeyName::Char('\r') | KeyName::Char('v') => select(pager),
            other => {
                let message =
                    format!("# error: keystroke '{other}' is not supported, press '?' for help");
                pager.show_status(&mut self.term, &message)?;
                LoopState::Listing
            }
        };
        Ok(next)
    }

    fn show_help(&mut self, pager: &Pager) -> Result<(), PickerError> {
        for page in help_pages(pager.layout().geometry.rows) {
            self.term.clear()?;
            let mut row = 1;
            for line in page {
                self.term.move_to(row, 1)?;
                self.term.print(line)?;
                row += 1;
            }
            self.term.move_to(row, 1)?;
            self.term.print(HELP_PROMPT)?;
            self.term.flush()?;
            self.keys.wait_for_enter()?;
        }
        pager.draw(&mut self.term)
    }

    fn open_file(&mut self, pager: &mut Pager, path: &Path) -> Result<(), PickerError> {
        if let Err(e) = self.launcher.open(path, self.session.cwd()) {
            warn!("Could not open {}: {}", path.display(), e);
            pager.show_status(&mut self.term, &format!("# {e}"))?;
        }
        Ok(())
    }
}

/// Enter a highlighted directory (or link to one), otherwise open it.
fn select(pager: &Pager) -> LoopState {
    match pager.highlighted_path() {
        Some(path) if resolves_to_dir(&path) => LoopState::ChangingDirectory(path),
        Some(path) => LoopState::OpeningFile(path),
        None => LoopState::Listing,
    }
}
