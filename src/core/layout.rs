//! # Page Layout
//!
//! Pure pagination arithmetic. The screen is split into three regions:
//!
//! ```text
//! row 1..=4          header  (title, help hint, parent dir, current dir)
//! row 5..=4+body     body    (one listing entry per row)
//! next 3 rows        footer  (blank, status line, page indicator)
//! ```
//!
//! Rows are 1-based terminal rows. `cursor_row` is always inside the body.
//! Nothing here touches the terminal; `tui::pager` does the drawing.

use super::error::PickerError;

pub const HEADER_LINES: u16 = 4;
pub const FOOTER_LINES: u16 = 3;

/// Fixed regions plus the live terminal size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportGeometry {
    pub header_lines: u16,
    pub footer_lines: u16,
    pub rows: u16,
    pub cols: u16,
}

impl ViewportGeometry {
    pub fn new(rows: u16, cols: u16) -> Self {
        Self {
            header_lines: HEADER_LINES,
            footer_lines: FOOTER_LINES,
            rows,
            cols,
        }
    }

    /// Smallest terminal height that can show one entry.
    pub fn min_rows(&self) -> u16 {
        self.header_lines + self.footer_lines + 1
    }

    /// Rows available for listing entries.
    pub fn capacity(&self) -> usize {
        usize::from(self.rows.saturating_sub(self.header_lines + self.footer_lines))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    pub page: usize,
    pub pages: usize,
    pub per_page: u16,
    pub start_offset: usize,
    /// Entries drawn on the current page.
    pub body_lines: usize,
    pub cursor_row: u16,
}

/// Page bookkeeping for a listing of `len` entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLayout {
    pub geometry: ViewportGeometry,
    pub len: usize,
    pub state: PaginationState,
}

impl PageLayout {
    /// First page of a freshly read listing.
    pub fn initial(len: usize, geometry: ViewportGeometry) -> Result<Self, PickerError> {
        let capacity = geometry.capacity();
        if capacity == 0 {
            return Err(PickerError::DegenerateLayout {
                rows: geometry.rows,
                required: geometry.min_rows(),
            });
        }

        let body_lines = capacity.min(len);
        let pages = if len == 0 { 1 } else { len.div_ceil(body_lines) };

        Ok(Self {
            geometry,
            len,
            state: PaginationState {
                page: 1,
                pages,
                per_page: geometry.rows,
                start_offset: 0,
                body_lines,
                cursor_row: geometry.header_lines + 1,
            },
        })
    }

    pub fn first_body_row(&self) -> u16 {
        self.geometry.header_lines + 1
    }

    /// Last body row of the current page. An empty page still has one row
    /// so the cursor never lands in the header.
    pub fn last_body_row(&self) -> u16 {
        let lines = u16::try_from(self.state.body_lines.max(1)).unwrap_or(u16::MAX);
        self.geometry.header_lines.saturating_add(lines)
    }

    /// Row of the `# i/N) name` line.
    pub fn status_row(&self) -> u16 {
        self.page_indicator_row() - 1
    }

    /// Row of the `> page/pages` line.
    pub fn page_indicator_row(&self) -> u16 {
        let body = u16::try_from(self.state.body_lines).unwrap_or(u16::MAX);
        self.geometry.header_lines + body + self.geometry.footer_lines
    }

    /// Listing index of the highlighted entry, if the page has one.
    pub fn highlighted_index(&self) -> Option<usize> {
        if self.state.body_lines == 0 {
            return None;
        }
        let offset_in_page = usize::from(self.state.cursor_row - self.first_body_row());
        let index = self.state.start_offset + offset_in_page;
        (index < self.len).then_some(index)
    }

    pub fn at_last_body_row(&self) -> bool {
        self.state.cursor_row >= self.last_body_row()
    }

    pub fn at_first_body_row(&self) -> bool {
        self.state.cursor_row <= self.first_body_row()
    }

    pub fn on_last_page(&self) -> bool {
        self.state.page >= self.state.pages
    }

    pub fn on_first_page(&self) -> bool {
        self.state.page <= 1
    }

    /// Move the cursor down one row. Returns false at the page bottom.
    pub fn step_down(&mut self) -> bool {
        if self.at_last_body_row() {
            return false;
        }
        self.state.cursor_row += 1;
        true
    }

    /// Move the cursor up one row. Returns false at the page top.
    pub fn step_up(&mut self) -> bool {
        if self.at_first_body_row() {
            return false;
        }
        self.state.cursor_row -= 1;
        true
    }

    /// Turn to the next page. Returns `Ok(false)` on the last page.
    pub fn turn_forward(&mut self) -> Result<bool, PickerError> {
        if self.on_last_page() {
            return Ok(false);
        }
        let offset = self.state.start_offset + self.state.body_lines;
        if offset >= self.len {
            return Err(PickerError::OffsetOverflow {
                offset,
                len: self.len,
            });
        }
        self.state.page += 1;
        self.state.start_offset = offset;
        self.state.body_lines = self.geometry.capacity().min(self.len - offset);
        self.state.cursor_row = self.first_body_row();
        Ok(true)
    }

    /// Turn to the previous page, landing on its first or last row.
    /// Returns false on the first page.
    pub fn turn_back(&mut self, jump_to_top: bool) -> bool {
        if self.on_first_page() {
            return false;
        }
        let capacity = self.geometry.capacity();
        self.state.page -= 1;
        self.state.start_offset = self.state.start_offset.saturating_sub(capacity);
        self.state.body_lines = capacity.min(self.len - self.state.start_offset);
        self.state.cursor_row = if jump_to_top {
            self.first_body_row()
        } else {
            self.last_body_row()
        };
        true
    }

    pub fn jump_top(&mut self) {
        self.state.cursor_row = self.first_body_row();
    }

    pub fn jump_bottom(&mut self) {
        self.state.cursor_row = self.last_body_row();
    }

    /// Index range of the entries on the current page.
    pub fn visible_range(&self) -> std::ops::Range<usize> {
        self.state.start_offset..self.state.start_offset + self.state.body_lines
    }
}

/// Number of decimal digits in `n`, used to right-align entry numbers.
pub fn count_digits(mut n: usize) -> usize {
    let mut count = 0;
    while n != 0 {
        n /= 10;
        count += 1;
    }
    count
}
