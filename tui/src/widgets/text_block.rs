//! TextBlock Widget
//!
//! A borderless, scrollable text region.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::StatefulWidget;
use textwrap::wrap;

/// State for a scrollable text block
#[derive(Clone, Debug, Default)]
pub struct TextBlockState {
    /// Scroll offset (lines from top)
    pub scroll_offset: usize,
    /// Total content lines, as of the last render
    pub total_lines: usize,
    /// Visible lines, as of the last render
    pub viewport: usize,
}

impl TextBlockState {
    /// Scroll by delta (positive = down), stopping at either end
    pub fn scroll(&mut self, delta: isize) {
        let max_scroll = self.max_scroll();
        self.scroll_offset = self.scroll_offset.saturating_add_signed(delta).min(max_scroll);
    }

    /// Scroll by one screenful
    pub fn page(&mut self, down: bool) {
        let step = isize::try_from(self.viewport.max(1)).unwrap_or(isize::MAX);
        self.scroll(if down { step } else { -step });
    }

    /// Back to the first line
    pub fn reset(&mut self) {
        self.scroll_offset = 0;
    }

    /// Whether lines are hidden below the viewport
    pub fn has_more_below(&self) -> bool {
        self.scroll_offset < self.max_scroll()
    }

    fn max_scroll(&self) -> usize {
        self.total_lines.saturating_sub(self.viewport)
    }
}

/// A borderless, scrollable text block
pub struct TextBlock<'a> {
    content: &'a str,
    style: Style,
}

impl<'a> TextBlock<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            style: Style::default(),
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl StatefulWidget for TextBlock<'_> {
    type State = TextBlockState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let area = area.intersection(buf.area);
        if area.width == 0 || area.height == 0 {
            return;
        }

        let wrapped: Vec<String> = self
            .content
            .lines()
            .flat_map(|line| {
                if line.is_empty() {
                    vec![String::new()]
                } else {
                    wrap(line, area.width as usize)
                        .into_iter()
                        .map(|cow| cow.to_string())
                        .collect()
                }
            })
            .collect();

        state.total_lines = wrapped.len();
        state.viewport = area.height as usize;
        state.scroll_offset = state.scroll_offset.min(state.max_scroll());

        for (line, y) in wrapped
            .iter()
            .skip(state.scroll_offset)
            .zip(area.y..area.y + area.height)
        {
            buf.set_stringn(area.x, y, line, area.width as usize, self.style);
        }
    }
}
