//! # TUI Adapter
//!
//! The terminal-facing layer. Draws pages, reads raw keys, and drives the
//! navigation loop over the core picker logic.
//!
//! This is the only module that knows about crossterm. The pager and
//! navigator draw through the gateway traits in [`terminal`], so tests run
//! them against an in-memory screen.
//!
//! ## Raw Mode
//!
//! Raw mode is held only while a key is being read (see
//! `terminal::RawModeGuard`). Drawing, the help prompt, and spawned
//! programs all see a terminal in its normal mode.

pub mod navigator;
pub mod pager;
pub mod signals;
pub mod terminal;

use std::path::PathBuf;

use log::info;

use crate::core::PickerError;
use crate::core::config::ResolvedConfig;
use crate::core::launcher::ProgramLauncher;
use crate::core::session::Session;
use navigator::Navigator;
use terminal::{CrosstermTerminal, StdinKeys};

/// Run an interactive session starting in `start`.
pub fn run(config: ResolvedConfig, start: PathBuf) -> Result<(), PickerError> {
    info!("Interactive session in {}", start.display());
    let mut navigator = Navigator::new(
        CrosstermTerminal::new(),
        StdinKeys,
        ProgramLauncher::new(config),
        Session::new(start),
    );
    let result = navigator.run();
    terminal::restore_terminal();
    result
}
