use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use sf::core::PickerError;
use sf::core::config::{ProgramEntry, ResolvedConfig};
use sf::core::key::{self, KEY_SIZE, KeyName};
use sf::core::launcher::{self, Launcher};
use sf::core::layout::{PageLayout, ViewportGeometry};
use sf::core::listing::{EntryKind, read_listing};
use sf::core::session::Session;
use sf::tui::navigator::Navigator;
use sf::tui::terminal::{CursorGateway, KeySource, ScreenGateway};

// ============================================================================
// Helper Types
// ============================================================================

/// Scratch directory removed when dropped
struct Scratch(PathBuf);

impl Scratch {
    fn new() -> Self {
        let dir = std::env::temp_dir().join(format!("sf-it-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        Self(dir)
    }

    fn touch(&self, name: &str) -> PathBuf {
        let path = self.0.join(name);
        fs::write(&path, b"").unwrap();
        path
    }

    fn mkdir(&self, name: &str) -> PathBuf {
        let path = self.0.join(name);
        fs::create_dir_all(&path).unwrap();
        path
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

/// Screen that keeps one string per row
struct Screen {
    rows: u16,
    cols: u16,
    lines: Vec<String>,
    row: usize,
}

impl Screen {
    fn new(rows: u16, cols: u16) -> Self {
        Self {
            rows,
            cols,
            lines: vec![String::new(); usize::from(rows)],
            row: 0,
        }
    }

    fn line(&self, row: u16) -> &str {
        self.lines[usize::from(row) - 1].trim_end()
    }
}

impl ScreenGateway for Screen {
    fn clear(&mut self) -> Result<(), PickerError> {
        self.lines.iter_mut().for_each(String::clear);
        self.row = 0;
        Ok(())
    }

    fn size(&mut self) -> Result<(u16, u16), PickerError> {
        Ok((self.rows, self.cols))
    }

    fn print(&mut self, text: &str) -> Result<(), PickerError> {
        self.lines[self.row].push_str(text);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), PickerError> {
        Ok(())
    }
}

impl CursorGateway for Screen {
    fn move_to(&mut self, row: u16, _col: u16) -> Result<(), PickerError> {
        self.row = usize::from(row) - 1;
        Ok(())
    }

    fn clear_line(&mut self) -> Result<(), PickerError> {
        self.lines[self.row].clear();
        Ok(())
    }

    fn reset_modes(&mut self) -> Result<(), PickerError> {
        Ok(())
    }
}

/// Plays back a key script, then presses Escape forever
struct Script(std::vec::IntoIter<[u8; KEY_SIZE]>);

impl Script {
    fn chars(keys: &str) -> Self {
        let keys: Vec<[u8; KEY_SIZE]> = keys.bytes().map(|b| [b, 0, 0]).collect();
        Self(keys.into_iter())
    }
}

impl KeySource for Script {
    fn read_key(&mut self) -> Result<[u8; KEY_SIZE], PickerError> {
        Ok(self.0.next().unwrap_or([27, 0, 0]))
    }

    fn wait_for_enter(&mut self) -> Result<(), PickerError> {
        Ok(())
    }
}

/// Remembers what it was asked to open
#[derive(Default)]
struct Opened(Vec<PathBuf>);

impl Launcher for Opened {
    fn open(&mut self, path: &Path, _cwd: &Path) -> Result<(), PickerError> {
        self.0.push(path.to_path_buf());
        Ok(())
    }
}

// ============================================================================
// Core
// ============================================================================

#[test]
fn test_decode_arrow_and_plain_keys() {
    assert_eq!(key::decode(&[27, 91, 65]).unwrap(), KeyName::Up);
    assert_eq!(key::decode(&[b';', b'2', b'B']).unwrap(), KeyName::ShiftDown);
    assert_eq!(key::decode(&[b'j', 0, 0]).unwrap(), KeyName::Char('j'));
    assert!(matches!(
        key::decode(&[27, 91]),
        Err(PickerError::InvalidKeyLength(2))
    ));
}

#[test]
fn test_layout_scenario_five_files_ten_rows() {
    let layout = PageLayout::initial(5, ViewportGeometry::new(10, 80)).unwrap();
    assert_eq!(layout.state.pages, 2);
    assert_eq!(layout.state.body_lines, 3);
    assert_eq!(layout.status_row(), 9);
    assert_eq!(layout.page_indicator_row(), 10);
}

#[test]
fn test_listing_is_sorted_with_indicators() {
    let scratch = Scratch::new();
    scratch.touch("zeta.txt");
    scratch.mkdir("alpha");
    scratch.touch("mid.pdf");

    let listing = read_listing(&scratch.0).unwrap();
    let names: Vec<String> = listing.entries.iter().map(|e| e.display_name()).collect();
    assert_eq!(names, vec!["alpha/", "mid.pdf", "zeta.txt"]);
    assert_eq!(listing.entries[0].kind, EntryKind::Directory);
}

#[test]
fn test_resolve_program_uses_configured_rule_then_builtin() {
    let scratch = Scratch::new();
    let csv = scratch.touch("table.csv");
    let pdf = scratch.touch("paper.pdf");
    let config = ResolvedConfig {
        programs: vec![ProgramEntry {
            extensions: vec!["csv".to_string()],
            program: "visidata".to_string(),
            args: vec![],
            needs_terminal: true,
        }],
        ..Default::default()
    };

    let rule = launcher::resolve_program(&csv, &config).unwrap();
    assert_eq!(
        launcher::command_line(&rule, &csv, &config),
        vec![
            OsString::from("xterm"),
            OsString::from("-e"),
            OsString::from("visidata"),
            csv.clone().into_os_string(),
        ]
    );

    let rule = launcher::resolve_program(&pdf, &config).unwrap();
    assert_eq!(rule.program, "mupdf");
    assert!(!rule.needs_terminal);
}

// ============================================================================
// Navigation
// ============================================================================

#[test]
fn test_walk_into_directory_and_open_file() {
    let scratch = Scratch::new();
    let docs = scratch.mkdir("docs");
    fs::write(docs.join("guide.txt"), b"").unwrap();
    scratch.touch("readme.md");

    // Enter "docs/", open "guide.txt"
    let mut nav = Navigator::new(
        Screen::new(12, 60),
        Script::chars("\r\r"),
        Opened::default(),
        Session::new(scratch.0.clone()),
    );
    nav.run().unwrap();

    assert_eq!(nav.launcher().0, vec![docs.join("guide.txt")]);
    assert_eq!(nav.session().cwd(), docs.as_path());
    assert_eq!(nav.session().previous(), Some(scratch.0.as_path()));
    assert_eq!(nav.terminal().line(4), " .) ./ [docs]");
}

#[test]
fn test_parent_then_back_returns_to_start() {
    let scratch = Scratch::new();
    let sub = scratch.mkdir("sub");

    let mut nav = Navigator::new(
        Screen::new(12, 60),
        Script::chars("-_"),
        Opened::default(),
        Session::new(sub.clone()),
    );
    nav.run().unwrap();

    assert_eq!(nav.session().cwd(), sub.as_path());
    assert_eq!(nav.session().previous(), Some(scratch.0.as_path()));
}

#[test]
fn test_tiny_terminal_ends_session() {
    let scratch = Scratch::new();
    scratch.touch("a.txt");

    let mut nav = Navigator::new(
        Screen::new(7, 60),
        Script::chars(""),
        Opened::default(),
        Session::new(scratch.0.clone()),
    );
    let err = nav.run().unwrap_err();
    assert!(matches!(err, PickerError::DegenerateLayout { rows: 7, .. }));
}
