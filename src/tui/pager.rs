//! # Pager
//!
//! Draws one directory listing a page at a time and moves the highlight.
//! Page arithmetic lives in `core::layout`; this module turns it into
//! screen output through the terminal gateways.
//!
//! ```text
//!   ### SF ###
//!   ?) help
//!   -) ../ [home]
//!   .) ./ [user]
//!  1) Documents/          ← cursor_row
//!  2) notes.txt
//!
//! # 1/2) Documents/       ← status row
//! > 1/1                   ← page indicator
//! ```
//!
//! Only full page turns clear the screen. Line moves rewrite the status row
//! and page indicator, then reposition the cursor.

use std::path::{Path, PathBuf};

use unicode_width::UnicodeWidthChar;

use super::terminal::Terminal;
use crate::core::PickerError;
use crate::core::config::PROG_NAME;
use crate::core::layout::{PageLayout, ViewportGeometry, count_digits};
use crate::core::listing::{DirectoryListing, FileEntry};

const EMPTY_STATUS: &str = "# empty directory, no files were found to select";

pub struct Pager {
    listing: DirectoryListing,
    layout: PageLayout,
    /// Digit width of the largest entry number.
    pad: usize,
}

impl Pager {
    /// Lay out the first page of `listing`. Nothing is drawn yet.
    pub fn new(listing: DirectoryListing, geometry: ViewportGeometry) -> Result<Self, PickerError> {
        let layout = PageLayout::initial(listing.len(), geometry)?;
        Ok(Self {
            pad: count_digits(listing.len()),
            listing,
            layout,
        })
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn listing(&self) -> &DirectoryListing {
        &self.listing
    }

    pub fn pages(&self) -> usize {
        self.layout.state.pages
    }

    /// Entry under the cursor, if any.
    pub fn highlighted(&self) -> Option<&FileEntry> {
        self.layout
            .highlighted_index()
            .and_then(|i| self.listing.get(i))
    }

    pub fn highlighted_path(&self) -> Option<PathBuf> {
        self.layout
            .highlighted_index()
            .and_then(|i| self.listing.path_of(i))
    }

    // ------------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------------

    pub fn advance_line<T: Terminal + ?Sized>(&mut self, term: &mut T) -> Result<(), PickerError> {
        if self.layout.step_down() {
            self.draw_footer(term)?;
            self.place_cursor(term)
        } else {
            self.advance_page(term)
        }
    }

    pub fn retreat_line<T: Terminal + ?Sized>(&mut self, term: &mut T) -> Result<(), PickerError> {
        if self.layout.step_up() {
            self.draw_footer(term)?;
            self.place_cursor(term)
        } else {
            self.retreat_page(term, false)
        }
    }

    pub fn advance_page<T: Terminal + ?Sized>(&mut self, term: &mut T) -> Result<(), PickerError> {
        if self.layout.turn_forward()? {
            self.draw(term)?;
        }
        Ok(())
    }

    pub fn retreat_page<T: Terminal + ?Sized>(
        &mut self,
        term: &mut T,
        jump_to_top: bool,
    ) -> Result<(), PickerError> {
        if self.layout.turn_back(jump_to_top) {
            self.draw(term)?;
        }
        Ok(())
    }

    pub fn jump_top<T: Terminal + ?Sized>(&mut self, term: &mut T) -> Result<(), PickerError> {
        self.layout.jump_top();
        self.draw_footer(term)?;
        self.place_cursor(term)
    }

    pub fn jump_bottom<T: Terminal + ?Sized>(&mut self, term: &mut T) -> Result<(), PickerError> {
        self.layout.jump_bottom();
        self.draw_footer(term)?;
        self.place_cursor(term)
    }

    /// Overwrite the status row with `message` until the next move.
    pub fn show_status<T: Terminal + ?Sized>(
        &mut self,
        term: &mut T,
        message: &str,
    ) -> Result<(), PickerError> {
        term.move_to(self.layout.status_row(), 1)?;
        term.clear_line()?;
        term.print(&self.fit(message))?;
        self.place_cursor(term)
    }

    // ------------------------------------------------------------------------
    // Drawing
    // ------------------------------------------------------------------------

    /// Repaint the whole current page.
    pub fn draw<T: Terminal + ?Sized>(&self, term: &mut T) -> Result<(), PickerError> {
        term.clear()?;
        self.draw_header(term)?;
        self.draw_body(term)?;
        self.draw_footer(term)?;
        term.reset_modes()?;
        self.place_cursor(term)
    }

    fn draw_header<T: Terminal + ?Sized>(&self, term: &mut T) -> Result<(), PickerError> {
        let (parent, current) = dir_names(&self.listing.dir);
        let indent = " ".repeat(self.pad);
        let lines = [
            format!("{indent}### {} ###", PROG_NAME.to_uppercase()),
            format!("{indent}?) help"),
            format!("{indent}-) ../ [{parent}]"),
            format!("{indent}.) ./ [{current}]"),
        ];
        for (row, line) in (1..).zip(lines.iter()) {
            self.write_row(term, row, line)?;
        }
        Ok(())
    }

    fn draw_body<T: Terminal + ?Sized>(&self, term: &mut T) -> Result<(), PickerError> {
        let first = self.layout.first_body_row();
        for (row, index) in (first..).zip(self.layout.visible_range()) {
            let Some(entry) = self.listing.get(index) else {
                break;
            };
            let line = format!(
                " {:>width$}) {}",
                index + 1,
                entry.display_name(),
                width = self.pad
            );
            self.write_row(term, row, &line)?;
        }
        Ok(())
    }

    /// Status row and page indicator. The blank row above them is left alone.
    fn draw_footer<T: Terminal + ?Sized>(&self, term: &mut T) -> Result<(), PickerError> {
        let (status, indicator) = match self.layout.highlighted_index() {
            Some(index) => {
                let entry = &self.listing.entries[index];
                (
                    format!("# {}/{}) {}", index + 1, self.listing.len(), entry.display_name()),
                    format!("> {}/{}", self.layout.state.page, self.layout.state.pages),
                )
            }
            None => (EMPTY_STATUS.to_string(), "> ".to_string()),
        };
        self.write_row(term, self.layout.status_row(), &status)?;
        self.write_row(term, self.layout.page_indicator_row(), &indicator)
    }

    fn write_row<T: Terminal + ?Sized>(
        &self,
        term: &mut T,
        row: u16,
        text: &str,
    ) -> Result<(), PickerError> {
        term.move_to(row, 1)?;
        term.clear_line()?;
        term.print(&self.fit(text))
    }

    fn place_cursor<T: Terminal + ?Sized>(&self, term: &mut T) -> Result<(), PickerError> {
        let col = u16::try_from(self.pad + 1).unwrap_or(1);
        term.move_to(self.layout.state.cursor_row, col)?;
        term.flush()
    }

    /// Cut `text` to the terminal width so it never wraps onto the next row.
    fn fit(&self, text: &str) -> String {
        truncate_to_width(text, usize::from(self.layout.geometry.cols))
    }
}

/// Longest prefix of `text` whose display width fits in `max_width` columns.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > max_width {
            break;
        }
        width += w;
        out.push(c);
    }
    out
}

/// `(parent name, current name)` as shown in the header; empty at the root.
fn dir_names(dir: &Path) -> (String, String) {
    let name = |p: &Path| {
        p.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    };
    let parent = dir.parent().map(name).unwrap_or_default();
    (parent, name(dir))
}
