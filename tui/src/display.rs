//! Display Geometry
//!
//! Where things go on screen. Everything here is pure arithmetic over
//! terminal sizes so it can be tested without a terminal:
//!
//! - [`Regions`]: header, grid, status bar and detail overlay bounds
//! - [`GridLayout`]: responsive card grid (one to six columns)
//! - [`GridCursor`]: focused card plus vertical scroll of the grid
//! - [`fit_width`]: truncate text to a display width

use ratatui::layout::Rect;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Header height (title/search line plus separator)
pub const HEADER_HEIGHT: u16 = 2;

/// Status bar height
pub const STATUS_HEIGHT: u16 = 1;

/// Card height: border, title, author, year and stars, border
pub const CARD_HEIGHT: u16 = 5;

/// Narrowest card before the grid drops a column
pub const MIN_CARD_WIDTH: u16 = 22;

/// Most columns the grid uses, however wide the terminal
pub const MAX_COLUMNS: u16 = 6;

/// Gap between cards, both directions
pub const CARD_GAP: u16 = 1;

/// Widest the detail overlay gets
pub const MAX_DETAIL_WIDTH: u16 = 96;

/// Screen regions for the fixed layers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Regions {
    /// Title, search and sort line
    pub header: Rect,
    /// Main area: spinner, error, empty message or card grid
    pub grid: Rect,
    /// Bottom status line
    pub status: Rect,
    /// Centered detail overlay
    pub detail: Rect,
}

impl Regions {
    /// Split the terminal area
    pub fn for_area(area: Rect) -> Self {
        let header_h = HEADER_HEIGHT.min(area.height);
        let status_h = STATUS_HEIGHT.min(area.height.saturating_sub(header_h));
        let grid_h = area.height.saturating_sub(header_h + status_h);

        let header = Rect::new(area.x, area.y, area.width, header_h);
        let grid = Rect::new(area.x, area.y + header_h, area.width, grid_h);
        let status = Rect::new(area.x, area.y + header_h + grid_h, area.width, status_h);

        let detail_w = area.width.saturating_sub(4).min(MAX_DETAIL_WIDTH);
        let detail_h = area.height.saturating_sub(2);
        let detail = Rect::new(
            area.x + (area.width - detail_w) / 2,
            area.y + (area.height - detail_h) / 2,
            detail_w,
            detail_h,
        );

        Self {
            header,
            grid,
            status,
            detail,
        }
    }
}

/// Responsive card grid geometry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridLayout {
    /// Cards per row
    pub columns: usize,
    /// Width of each card
    pub card_width: u16,
    /// Rows that fit in the grid area
    pub visible_rows: usize,
}

impl GridLayout {
    /// Fit as many columns as the width allows, up to [`MAX_COLUMNS`]
    pub fn for_size(width: u16, height: u16) -> Self {
        let columns = ((width + CARD_GAP) / (MIN_CARD_WIDTH + CARD_GAP)).clamp(1, MAX_COLUMNS);
        let card_width = width.saturating_sub(CARD_GAP * (columns - 1)) / columns;
        let visible_rows = usize::from(((height + CARD_GAP) / (CARD_HEIGHT + CARD_GAP)).max(1));

        Self {
            columns: usize::from(columns),
            card_width,
            visible_rows,
        }
    }

    /// Cards visible at once
    pub fn page_size(&self) -> usize {
        self.columns * self.visible_rows
    }

    /// Bounds of the card in a visible slot, relative to the grid origin
    pub fn card_rect(&self, slot: usize) -> Rect {
        let col = u16::try_from(slot % self.columns).unwrap_or(0);
        let row = u16::try_from(slot / self.columns).unwrap_or(0);
        Rect::new(
            col * (self.card_width + CARD_GAP),
            row * (CARD_HEIGHT + CARD_GAP),
            self.card_width,
            CARD_HEIGHT,
        )
    }

    /// Visible slot under a position relative to the grid origin (gaps hit nothing)
    pub fn slot_at(&self, x: u16, y: u16) -> Option<usize> {
        let col = usize::from(x / (self.card_width + CARD_GAP));
        let row = usize::from(y / (CARD_HEIGHT + CARD_GAP));
        let in_card = x % (self.card_width + CARD_GAP) < self.card_width
            && y % (CARD_HEIGHT + CARD_GAP) < CARD_HEIGHT;

        (in_card && col < self.columns && row < self.visible_rows)
            .then_some(row * self.columns + col)
    }
}

/// Focused card and grid scroll position
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GridCursor {
    position: usize,
    top_row: usize,
}

impl GridCursor {
    /// Focused position in the view
    pub fn position(&self) -> usize {
        self.position
    }

    /// First visible row
    pub fn top_row(&self) -> usize {
        self.top_row
    }

    /// Back to the first card
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Move by `delta` cards, stopping at either end of the view
    pub fn move_by(&mut self, delta: isize, len: usize, layout: &GridLayout) {
        if len == 0 {
            self.reset();
            return;
        }
        self.position = self.position.saturating_add_signed(delta).min(len - 1);
        self.scroll_into_view(layout);
    }

    /// Move one card sideways without wrapping to another row
    pub fn move_in_row(&mut self, right: bool, len: usize, layout: &GridLayout) {
        let col = self.position % layout.columns;
        let delta = match (right, col) {
            (false, 0) => 0,
            (false, _) => -1,
            (true, c) if c + 1 >= layout.columns => 0,
            (true, _) => 1,
        };
        self.move_by(delta, len, layout);
    }

    /// Move one row up or down
    pub fn move_row(&mut self, down: bool, len: usize, layout: &GridLayout) {
        let step = isize::try_from(layout.columns).unwrap_or(1);
        if down && self.position + layout.columns >= len {
            return;
        }
        self.move_by(if down { step } else { -step }, len, layout);
    }

    /// Jump to a position (mouse click)
    pub fn jump_to(&mut self, position: usize, len: usize, layout: &GridLayout) {
        if position < len {
            self.position = position;
            self.scroll_into_view(layout);
        }
    }

    /// Keep the cursor inside a view of `len` books
    pub fn clamp(&mut self, len: usize, layout: &GridLayout) {
        if len == 0 {
            self.reset();
        } else {
            self.position = self.position.min(len - 1);
            self.scroll_into_view(layout);
        }
    }

    /// Scroll the grid so the focused row is visible
    pub fn scroll_into_view(&mut self, layout: &GridLayout) {
        let row = self.position / layout.columns;
        if row < self.top_row {
            self.top_row = row;
        } else if row >= self.top_row + layout.visible_rows {
            self.top_row = row + 1 - layout.visible_rows;
        }
    }
}

/// Truncate `text` to at most `width` display columns, ending in `…` if cut
pub fn fit_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}
