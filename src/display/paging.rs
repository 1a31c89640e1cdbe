//! Horizontal addressing emulated on top of page addressing.
//!
//! The controller only auto-increments the column within one page, so a horizontal-scan buffer is
//! cut into segments that each start with an explicit page and column address. The cursor keeps
//! the next unwritten cell between writes, so a frame can be streamed in chunks.

use crate::command::consts::{COLS_USED, PAGES};

/// The next unwritten cell on the controller: `column` in [0, `COLS_USED`), `page` in [0,
/// `PAGES`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cursor {
    pub(crate) col: u8,
    pub(crate) page: u8,
}

/// One page-addressed burst: `len` visible bytes written from (`col`, `page`), followed by `pad`
/// blank bytes when the burst reaches the end of the visible row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Segment {
    pub page: u8,
    pub col: u8,
    pub len: usize,
    pub pad: usize,
}

impl Cursor {
    pub fn column(&self) -> u8 {
        self.col
    }

    pub fn page(&self) -> u8 {
        self.page
    }

    /// The segment that writes up to `remaining` bytes from the current cell, for a controller
    /// with `cols_total` physical columns.
    pub(crate) fn segment(self, remaining: usize, cols_total: u8) -> Segment {
        let room = usize::from(COLS_USED - self.col);
        let len = remaining.min(room);
        let pad = if len == room {
            usize::from(cols_total.saturating_sub(COLS_USED))
        } else {
            0
        };
        Segment {
            page: self.page,
            col: self.col,
            len,
            pad,
        }
    }

    /// Step past a written segment, moving to the next page (wrapping after the last) when the
    /// row was finished.
    pub(crate) fn advance(&mut self, segment: &Segment) {
        let col = usize::from(segment.col) + segment.len;
        if col >= usize::from(COLS_USED) {
            self.col = 0;
            self.page = (self.page + 1) % PAGES;
        } else {
            self.col = col as u8;
        }
    }
}

/// Iterator cutting `data` into segments starting at `cursor`, advancing the cursor as each
/// segment is handed out.
pub(crate) struct Segments<'c, 'd> {
    cursor: &'c mut Cursor,
    data: &'d [u8],
    cols_total: u8,
}

impl<'c, 'd> Segments<'c, 'd> {
    pub fn new(cursor: &'c mut Cursor, data: &'d [u8], cols_total: u8) -> Self {
        Self {
            cursor,
            data,
            cols_total,
        }
    }
}

impl<'c, 'd> Iterator for Segments<'c, 'd> {
    type Item = (Segment, &'d [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.data.is_empty() {
            return None;
        }
        let segment = self.cursor.segment(self.data.len(), self.cols_total);
        let (row, rest) = self.data.split_at(segment.len);
        self.data = rest;
        self.cursor.advance(&segment);
        Some((segment, row))
    }
}
