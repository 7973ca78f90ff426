//! # Key Decoding
//!
//! Every read from the terminal pulls exactly three bytes, zero-padded when
//! the key produced fewer. `decode()` turns those bytes into a `KeyName`.
//!
//! ```text
//! [b'j', 0, 0]    → Char('j')
//! [27, 0, 0]      → Escape
//! [27, b'[', b'A'] → Up
//! [b';', b'2', b'A'] → ShiftUp   (tail of ESC [ 1 ; 2 A)
//! ```

use std::fmt;

use super::error::PickerError;

/// Number of bytes consumed by every key read.
pub const KEY_SIZE: usize = 3;

const ESC: u8 = 27;
const LF: u8 = 10;

/// Symbolic name of a decoded keypress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyName {
    Escape,
    Enter,
    Up,
    Down,
    Right,
    Left,
    ShiftUp,
    ShiftDown,
    Char(char),
    /// Unrecognized sequence, kept as the raw bytes read.
    Unknown([u8; KEY_SIZE]),
}

/// Known multi-byte sequences, matched exactly.
const SEQUENCES: &[([u8; KEY_SIZE], KeyName)] = &[
    ([ESC, b'[', b'A'], KeyName::Up),
    ([ESC, b'[', b'B'], KeyName::Down),
    ([ESC, b'[', b'C'], KeyName::Right),
    ([ESC, b'[', b'D'], KeyName::Left),
    ([b';', b'2', b'A'], KeyName::ShiftUp),
    ([b';', b'2', b'B'], KeyName::ShiftDown),
];

/// Decode a raw key read into a `KeyName`.
pub fn decode(bytes: &[u8]) -> Result<KeyName, PickerError> {
    let key: [u8; KEY_SIZE] = bytes
        .try_into()
        .map_err(|_| PickerError::InvalidKeyLength(bytes.len()))?;

    if key[0] != 0 && key[1] == 0 && key[2] == 0 {
        return Ok(match key[0] {
            ESC => KeyName::Escape,
            LF => KeyName::Enter,
            b => KeyName::Char(char::from(b)),
        });
    }

    Ok(SEQUENCES
        .iter()
        .find(|(seq, _)| *seq == key)
        .map(|(_, name)| name.clone())
        .unwrap_or(KeyName::Unknown(key)))
}

impl fmt::Display for KeyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyName::Escape => write!(f, "escape"),
            KeyName::Enter => write!(f, "enter"),
            KeyName::Up => write!(f, "up"),
            KeyName::Down => write!(f, "down"),
            KeyName::Right => write!(f, "right"),
            KeyName::Left => write!(f, "left"),
            KeyName::ShiftUp => write!(f, "UP"),
            KeyName::ShiftDown => write!(f, "DOWN"),
            KeyName::Char(c) => write!(f, "{}", c.escape_default()),
            KeyName::Unknown(bytes) => {
                // Control bytes would move the cursor if printed verbatim
                let text = String::from_utf8_lossy(bytes);
                write!(f, "{}", text.escape_default())
            }
        }
    }
}
