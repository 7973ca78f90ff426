use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors raised while listing, paginating, or opening files.
///
/// Anything returned by a `Launcher` is shown on the status line and the
/// session goes on. Everything else aborts the session.
#[derive(Debug)]
pub enum PickerError {
    /// The path does not exist.
    NotFound(PathBuf),
    /// No program rule matches and the path is not a regular file.
    UnsupportedFormat(String),
    /// Terminal too small to fit header, footer and one body line.
    DegenerateLayout { rows: u16, required: u16 },
    /// Page bookkeeping moved the start offset past the end of the listing.
    OffsetOverflow { offset: usize, len: usize },
    /// A raw key read did not yield exactly three bytes.
    InvalidKeyLength(usize),
    /// The terminal did not report a usable size.
    TerminalQueryFailure(String),
    /// The viewer program could not be started.
    Spawn { program: String, source: io::Error },
    /// Ctrl-C arrived as a key byte while in raw mode.
    Interrupted,
    /// Directory read or terminal write failed.
    Io(io::Error),
}

impl fmt::Display for PickerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickerError::NotFound(path) => {
                write!(f, "'{}' no such file or directory", path.display())
            }
            PickerError::UnsupportedFormat(ext) => {
                write!(f, "file format '{ext}' is not supported")
            }
            PickerError::DegenerateLayout { rows, required } => write!(
                f,
                "the terminal window is too small ({rows} rows, need at least {required})"
            ),
            PickerError::OffsetOverflow { offset, len } => write!(
                f,
                "start offset {offset} is past the end of the listing ({len} entries)"
            ),
            PickerError::InvalidKeyLength(len) => {
                write!(f, "key needs to be size 3, got {len}")
            }
            PickerError::TerminalQueryFailure(msg) => write!(f, "terminal size query failed: {msg}"),
            PickerError::Spawn { program, source } => {
                write!(f, "failed to start '{program}': {source}")
            }
            PickerError::Interrupted => write!(f, "interrupted"),
            PickerError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for PickerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PickerError::Spawn { source, .. } => Some(source),
            PickerError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for PickerError {
    fn from(e: io::Error) -> Self {
        PickerError::Io(e)
    }
}
