//! # Terminal Collaborators
//!
//! Traits the pager and navigation loop draw and read through, plus the
//! crossterm-backed implementations used at runtime.
//!
//! - [`ScreenGateway`]: clear, size query, text output
//! - [`CursorGateway`]: absolute positioning, line clearing, attribute reset
//! - [`KeySource`]: blocking 3-byte key reads
//!
//! Rows and columns are 1-based throughout; the crossterm adapter converts
//! to its 0-based `MoveTo`.

use std::io::{self, BufRead, Read, Stdout, Write, stdout};

use crossterm::cursor::{MoveTo, Show};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{Clear, ClearType, disable_raw_mode, enable_raw_mode};
use crossterm::{execute, queue};
use log::{debug, warn};

use crate::core::PickerError;
use crate::core::key::KEY_SIZE;

/// ASCII end-of-text, what Ctrl-C sends once raw mode disables ISIG.
const ETX: u8 = 3;

pub trait ScreenGateway {
    fn clear(&mut self) -> Result<(), PickerError>;
    /// Returns `(rows, cols)`.
    fn size(&mut self) -> Result<(u16, u16), PickerError>;
    /// Write text at the cursor position.
    fn print(&mut self, text: &str) -> Result<(), PickerError>;
    fn flush(&mut self) -> Result<(), PickerError>;
}

pub trait CursorGateway {
    fn move_to(&mut self, row: u16, col: u16) -> Result<(), PickerError>;
    /// Clear from the cursor to the end of the line.
    fn clear_line(&mut self) -> Result<(), PickerError>;
    fn reset_modes(&mut self) -> Result<(), PickerError>;
}

/// Anything the pager can draw on.
pub trait Terminal: ScreenGateway + CursorGateway {}

impl<T: ScreenGateway + CursorGateway> Terminal for T {}

/// Source of raw keypresses.
pub trait KeySource {
    /// Block until a key arrives. Unused trailing bytes are zero.
    fn read_key(&mut self) -> Result<[u8; KEY_SIZE], PickerError>;
    /// Block until the user presses Enter in canonical mode.
    fn wait_for_enter(&mut self) -> Result<(), PickerError>;
}

// ============================================================================
// Crossterm adapter
// ============================================================================

pub struct CrosstermTerminal {
    out: Stdout,
}

impl CrosstermTerminal {
    pub fn new() -> Self {
        Self { out: stdout() }
    }
}

impl Default for CrosstermTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenGateway for CrosstermTerminal {
    fn clear(&mut self) -> Result<(), PickerError> {
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        Ok(())
    }

    fn size(&mut self) -> Result<(u16, u16), PickerError> {
        let (cols, rows) = crossterm::terminal::size()
            .map_err(|e| PickerError::TerminalQueryFailure(e.to_string()))?;
        if rows == 0 || cols == 0 {
            return Err(PickerError::TerminalQueryFailure(format!(
                "terminal reported {rows} rows and {cols} columns"
            )));
        }
        Ok((rows, cols))
    }

    fn print(&mut self, text: &str) -> Result<(), PickerError> {
        queue!(self.out, Print(text))?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), PickerError> {
        self.out.flush()?;
        Ok(())
    }
}

impl CursorGateway for CrosstermTerminal {
    fn move_to(&mut self, row: u16, col: u16) -> Result<(), PickerError> {
        queue!(self.out, MoveTo(col.saturating_sub(1), row.saturating_sub(1)))?;
        Ok(())
    }

    fn clear_line(&mut self) -> Result<(), PickerError> {
        queue!(self.out, Clear(ClearType::UntilNewLine))?;
        Ok(())
    }

    fn reset_modes(&mut self) -> Result<(), PickerError> {
        queue!(self.out, SetAttribute(Attribute::Reset))?;
        Ok(())
    }
}

// ============================================================================
// Raw mode
// ============================================================================

/// Holds the terminal in raw mode; canonical mode and echo come back on drop.
pub struct RawModeGuard;

impl RawModeGuard {
    pub fn acquire() -> Result<Self, PickerError> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            warn!("Failed to leave raw mode: {}", e);
        }
    }
}

/// Put the terminal back into a usable state. Safe to call more than once.
pub fn restore_terminal() {
    if let Err(e) = disable_raw_mode() {
        warn!("Failed to leave raw mode: {}", e);
    }
    let _ = execute!(stdout(), SetAttribute(Attribute::Reset), Show, Print("\r\n"));
}

/// Reads keys from stdin, entering raw mode only for the duration of each read.
pub struct StdinKeys;

impl KeySource for StdinKeys {
    fn read_key(&mut self) -> Result<[u8; KEY_SIZE], PickerError> {
        let mut key = [0u8; KEY_SIZE];
        let read = {
            let _raw = RawModeGuard::acquire()?;
            io::stdin().lock().read(&mut key)?
        };
        if read == 0 {
            return Err(PickerError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stdin closed",
            )));
        }
        debug!("Key bytes: {:?}", &key[..read]);
        if key[0] == ETX {
            return Err(PickerError::Interrupted);
        }
        Ok(key)
    }

    fn wait_for_enter(&mut self) -> Result<(), PickerError> {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(())
    }
}
