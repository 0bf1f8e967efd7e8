//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, mouse, resize)
//! - Shell for library state and the fetch lifecycle
//! - Compositor for layered rendering
//!
//! The App only owns what is purely visual: which card has focus, how far
//! the grid and the description are scrolled, and whether the search field
//! is being edited. Everything else is read from the shell each frame.
//!
//! # Layers
//!
//! | Layer  | z   | Contents                                        |
//! |--------|-----|-------------------------------------------------|
//! | grid   | 0   | spinner, error, empty message or card grid      |
//! | header | 10  | title, search field, sort                       |
//! | status | 10  | phase, match count, key hints                   |
//! | detail | 100 | opaque book detail overlay, shown when selected |

use std::time::Duration;

use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, StatefulWidget, Widget, Wrap};
use ratatui::Terminal;

use shelf_core::book::PUBLIC_DOMAIN_BEFORE;
use shelf_core::{
    Book, FetchPhase, LibrarySource, Shell, ShellEvent, ShellStatus, LIBRARY_UNAVAILABLE,
};

use crate::compositor::{Compositor, LayerId};
use crate::display::{fit_width, GridCursor, GridLayout, Regions};
use crate::theme::{
    ACCENT_TEAL, CARD_BORDER, DIM_GRAY, ERROR_RED, GENRE_TEAL, PANEL_BG, STAR_EMPTY,
    STAR_YELLOW, TEXT_PRIMARY, TEXT_SECONDARY,
};
use crate::widgets::{TextBlock, TextBlockState};

/// Frame tick when no input arrives
const FRAME_TICK: Duration = Duration::from_millis(80);

/// Loading spinner, one frame per tick
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

const APP_TITLE: &str = "storyshelf";
const LOADING_TEXT: &str = "Generating Your Library...";
const NO_MATCHES_TEXT: &str = "No books found matching your search.";
const RETRY_HINT: &str = "Press r to try again";
const FOOTER_TEXT: &str = "Powered by Gemini API";
const KEY_HINTS: &str = "/ search  s sort  d direction  r reload  Enter open  q quit";

/// Stars in a rating bar
const STAR_COUNT: usize = 5;

/// Lines moved per mouse wheel notch in the description
const WHEEL_LINES: isize = 3;

/// What typed characters do
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InputMode {
    /// Keys navigate the grid
    #[default]
    Browse,
    /// Keys edit the search query
    Search,
}

/// Main application state
pub struct App<S: LibrarySource + 'static> {
    /// Is the app still running?
    running: bool,

    /// Library state and fetch lifecycle
    shell: Shell<S>,

    /// The layered compositor
    compositor: Compositor,
    /// Layer assignments
    layers: AppLayers,
    /// Current screen regions
    regions: Regions,

    /// Whether keys go to the search field
    mode: InputMode,
    /// Focused card and grid scroll
    cursor: GridCursor,
    /// Description scroll in the detail overlay
    detail_scroll: TextBlockState,
    /// Spinner frame counter
    spinner_frame: usize,
}

/// Layer IDs for UI regions
struct AppLayers {
    header: LayerId,
    grid: LayerId,
    status: LayerId,
    detail: LayerId,
}

impl<S: LibrarySource + 'static> App<S> {
    /// Create a new App over a library source, sized to `area`
    pub fn new(source: S, area: Rect) -> Self {
        let regions = Regions::for_area(area);
        let mut compositor = Compositor::new(area);

        let grid = compositor.create_layer(regions.grid, 0);
        let header = compositor.create_layer(regions.header, 10);
        let status = compositor.create_layer(regions.status, 10);
        let detail = compositor.create_layer(regions.detail, 100);
        compositor.set_opaque(detail, true);
        compositor.set_visible(detail, false);

        Self {
            running: true,
            shell: Shell::new(source),
            compositor,
            layers: AppLayers {
                header,
                grid,
                status,
                detail,
            },
            regions,
            mode: InputMode::Browse,
            cursor: GridCursor::default(),
            detail_scroll: TextBlockState::default(),
            spinner_frame: 0,
        }
    }

    /// The shell this app renders
    pub fn shell(&self) -> &Shell<S> {
        &self.shell
    }

    /// Whether the event loop should keep going
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current input mode
    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// Position of the focused card in the view
    pub fn cursor_position(&self) -> usize {
        self.cursor.position()
    }

    /// The focused book, if the grid is showing
    pub fn focused_book(&self) -> Option<&Book> {
        if self.grid_shown() {
            self.shell.view_book(self.cursor.position())
        } else {
            None
        }
    }

    /// Kick off the first fetch
    pub fn start(&mut self) {
        self.shell.handle_event(ShellEvent::Mounted);
    }

    /// Wait for the fetch in flight and apply it
    pub async fn wait_for_fetch(&mut self) -> bool {
        let changed = self.shell.wait_for_fetch().await;
        if changed {
            self.after_fetch();
        }
        changed
    }

    /// Main event loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();

        self.start();

        // Render initial frame immediately so the spinner shows
        self.render(terminal)?;

        while self.running {
            tokio::select! {
                biased;

                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_terminal_event(event),
                        Some(Err(e)) => tracing::warn!(error = %e, "Terminal event error"),
                        None => {
                            tracing::info!("Terminal event stream closed");
                            self.running = false;
                        }
                    }
                }

                _ = tokio::time::sleep(FRAME_TICK) => {}
            }

            self.tick();
            self.render(terminal)?;
        }

        Ok(())
    }

    /// Apply finished fetches and advance animations
    pub fn tick(&mut self) {
        if self.shell.poll_fetch() {
            self.after_fetch();
        }
        if self.shell.is_loading() {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
        let layout = self.grid_layout();
        self.cursor.clamp(self.shell.view_len(), &layout);
    }

    /// Handle one terminal event
    pub fn handle_terminal_event(&mut self, event: Event) {
        match event {
            // Only handle Press events (not Release or Repeat)
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(w, h) => self.handle_resize(w, h),
            _ => {}
        }
    }

    fn after_fetch(&mut self) {
        if self.shell.phase() == FetchPhase::Ready {
            self.cursor.reset();
        }
        self.detail_scroll.reset();
    }

    fn quit(&mut self) {
        tracing::info!("Quit requested");
        self.running = false;
    }

    fn grid_layout(&self) -> GridLayout {
        GridLayout::for_size(self.regions.grid.width, self.regions.grid.height)
    }

    fn grid_shown(&self) -> bool {
        matches!(self.shell.status(), ShellStatus::Showing(_))
    }

    fn detail_open(&self) -> bool {
        self.shell.selected().is_some()
    }

    /// Handle keyboard input
    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return;
        }

        if self.detail_open() {
            self.handle_detail_key(key);
            return;
        }

        match self.mode {
            InputMode::Search => self.handle_search_key(key),
            InputMode::Browse => self.handle_browse_key(key),
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => self.mode = InputMode::Browse,
            KeyCode::Backspace => {
                let mut query = self.shell.query().to_string();
                if query.pop().is_some() {
                    self.set_query(query);
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let mut query = self.shell.query().to_string();
                query.push(c);
                self.set_query(query);
            }
            _ => {}
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) {
        let layout = self.grid_layout();
        let len = self.shell.view_len();
        let page = isize::try_from(layout.page_size()).unwrap_or(1);

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit(),

            KeyCode::Char('/') => self.mode = InputMode::Search,

            // Grid navigation
            KeyCode::Left | KeyCode::Char('h') => self.cursor.move_in_row(false, len, &layout),
            KeyCode::Right | KeyCode::Char('l') => self.cursor.move_in_row(true, len, &layout),
            KeyCode::Up | KeyCode::Char('k') => self.cursor.move_row(false, len, &layout),
            KeyCode::Down | KeyCode::Char('j') => self.cursor.move_row(true, len, &layout),
            KeyCode::PageUp => self.cursor.move_by(-page, len, &layout),
            KeyCode::PageDown => self.cursor.move_by(page, len, &layout),
            KeyCode::Home => self.cursor.reset(),
            KeyCode::End => self.cursor.move_by(isize::MAX, len, &layout),

            KeyCode::Enter => self.open_focused(),

            // Sort
            KeyCode::Char('s') => {
                let next = self.shell.sort().key.next();
                self.shell.handle_event(ShellEvent::SortKeyChanged(next));
                self.cursor.reset();
            }
            KeyCode::Char('d') => {
                self.shell.handle_event(ShellEvent::SortDirectionToggled);
                self.cursor.reset();
            }

            KeyCode::Char('r') => self.shell.handle_event(ShellEvent::RetryRequested),

            _ => {}
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter | KeyCode::Backspace => {
                self.shell.handle_event(ShellEvent::SelectionDismissed);
            }
            KeyCode::Up | KeyCode::Char('k') => self.detail_scroll.scroll(-1),
            KeyCode::Down | KeyCode::Char('j') => self.detail_scroll.scroll(1),
            KeyCode::PageUp => self.detail_scroll.page(false),
            KeyCode::PageDown | KeyCode::Char(' ') => self.detail_scroll.page(true),
            _ => {}
        }
    }

    /// Handle mouse input
    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let layout = self.grid_layout();
        let len = self.shell.view_len();

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let hit = self.compositor.layer_at(mouse.column, mouse.row);
                if self.detail_open() {
                    // Clicking outside the overlay closes it
                    if hit != Some(self.layers.detail) {
                        self.shell.handle_event(ShellEvent::SelectionDismissed);
                    }
                } else if hit == Some(self.layers.grid) && self.grid_shown() {
                    let grid = self.regions.grid;
                    let slot = layout.slot_at(
                        mouse.column.saturating_sub(grid.x),
                        mouse.row.saturating_sub(grid.y),
                    );
                    if let Some(slot) = slot {
                        let position = self.cursor.top_row() * layout.columns + slot;
                        if position < len {
                            self.cursor.jump_to(position, len, &layout);
                            self.open_focused();
                        }
                    }
                }
            }
            MouseEventKind::ScrollUp => {
                if self.detail_open() {
                    self.detail_scroll.scroll(-WHEEL_LINES);
                } else {
                    self.cursor.move_row(false, len, &layout);
                }
            }
            MouseEventKind::ScrollDown => {
                if self.detail_open() {
                    self.detail_scroll.scroll(WHEEL_LINES);
                } else {
                    self.cursor.move_row(true, len, &layout);
                }
            }
            _ => {}
        }
    }

    /// Handle terminal resize
    fn handle_resize(&mut self, width: u16, height: u16) {
        let area = Rect::new(0, 0, width, height);
        self.regions = Regions::for_area(area);
        self.compositor.resize(area);

        self.compositor.place_layer(self.layers.header, self.regions.header);
        self.compositor.place_layer(self.layers.grid, self.regions.grid);
        self.compositor.place_layer(self.layers.status, self.regions.status);
        self.compositor.place_layer(self.layers.detail, self.regions.detail);

        let layout = self.grid_layout();
        self.cursor.clamp(self.shell.view_len(), &layout);
    }

    fn set_query(&mut self, query: String) {
        self.shell.handle_event(ShellEvent::QueryChanged(query));
        self.cursor.reset();
    }

    fn open_focused(&mut self) {
        let Some(id) = self.focused_book().map(|book| book.id.clone()) else {
            return;
        };
        self.shell.handle_event(ShellEvent::BookSelected(id));
        self.detail_scroll.reset();
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Render the UI
    pub fn render<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        let detail_open = self.detail_open();
        self.compositor.set_visible(self.layers.detail, detail_open);

        self.render_header();
        self.render_main();
        self.render_status();
        if detail_open {
            self.render_detail();
        }

        terminal.draw(|frame| {
            let output = self.compositor.composite();
            let area = frame.area();
            let buf = frame.buffer_mut();

            for y in 0..area.height.min(output.area.height) {
                for x in 0..area.width.min(output.area.width) {
                    if let (Some(src), Some(dst)) = (output.cell((x, y)), buf.cell_mut((x, y))) {
                        *dst = src.clone();
                    }
                }
            }
        })?;

        Ok(())
    }

    /// Render header layer: title, search field, sort
    fn render_header(&mut self) {
        let searching = self.mode == InputMode::Search;
        let query = self.shell.query();
        let sort = self.shell.sort();

        let Some(buf) = self.compositor.layer_buffer_mut(self.layers.header) else {
            return;
        };
        buf.reset();
        let area = buf.area;

        let brand = format!(" ▤ {APP_TITLE}");
        put(
            buf,
            0,
            0,
            &brand,
            Style::default().fg(ACCENT_TEAL).add_modifier(Modifier::BOLD),
        );

        let search_x = u16::try_from(brand.chars().count() + 3).unwrap_or(u16::MAX);
        let search = if searching {
            Line::from(vec![
                Span::styled("Search: ", Style::default().fg(ACCENT_TEAL)),
                Span::styled(format!("{query}▏"), Style::default().fg(TEXT_PRIMARY)),
            ])
        } else if query.is_empty() {
            Line::styled("/ to search", Style::default().fg(DIM_GRAY))
        } else {
            Line::from(vec![
                Span::styled("Search: ", Style::default().fg(TEXT_SECONDARY)),
                Span::styled(query.to_string(), Style::default().fg(TEXT_PRIMARY)),
            ])
        };
        put_line(buf, search_x, 0, &search);

        let sort_label = format!("Sort: {} {} ", sort.key.label(), sort.direction.arrow());
        let sort_width = u16::try_from(sort_label.chars().count()).unwrap_or(u16::MAX);
        if area.width > search_x.saturating_add(sort_width) {
            put(
                buf,
                area.width - sort_width,
                0,
                &sort_label,
                Style::default().fg(TEXT_SECONDARY),
            );
        }

        let separator = "─".repeat(area.width as usize);
        put(buf, 0, 1, &separator, Style::default().fg(CARD_BORDER));
    }

    /// Render the main area for the current status
    fn render_main(&mut self) {
        let status = self.shell.status();
        let view = self.shell.view();
        let error = self.shell.error_message().unwrap_or(LIBRARY_UNAVAILABLE);
        let spinner = SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()];
        let cursor = self.cursor;
        let layout = GridLayout::for_size(self.regions.grid.width, self.regions.grid.height);

        let Some(buf) = self.compositor.layer_buffer_mut(self.layers.grid) else {
            return;
        };
        buf.reset();

        match status {
            ShellStatus::Idle => {}
            ShellStatus::Loading => draw_centered(
                buf,
                vec![
                    Line::styled(spinner, Style::default().fg(ACCENT_TEAL)),
                    Line::default(),
                    Line::styled(LOADING_TEXT, Style::default().fg(TEXT_SECONDARY)),
                ],
            ),
            ShellStatus::Failed => draw_centered(
                buf,
                vec![
                    Line::styled(error, Style::default().fg(ERROR_RED)),
                    Line::default(),
                    Line::styled(
                        RETRY_HINT,
                        Style::default().fg(TEXT_PRIMARY).add_modifier(Modifier::BOLD),
                    ),
                ],
            ),
            ShellStatus::NoMatches => draw_centered(
                buf,
                vec![Line::styled(NO_MATCHES_TEXT, Style::default().fg(TEXT_SECONDARY))],
            ),
            ShellStatus::Showing(_) => draw_grid(buf, &view, cursor, &layout),
        }
    }

    /// Render status bar
    fn render_status(&mut self) {
        let status = self.shell.status();
        let phase = self.shell.phase();
        let total = self.shell.library().len();

        let Some(buf) = self.compositor.layer_buffer_mut(self.layers.status) else {
            return;
        };
        buf.reset();
        let area = buf.area;

        let summary = match status {
            ShellStatus::Showing(n) => format!("{n} of {total} books"),
            ShellStatus::NoMatches => format!("0 of {total} books"),
            _ => phase.description().to_string(),
        };

        let status_style = match status {
            ShellStatus::Loading => Style::default().fg(ACCENT_TEAL),
            ShellStatus::Failed => Style::default().fg(ERROR_RED),
            _ => Style::default().fg(DIM_GRAY),
        };

        let left = format!(" {summary} | {KEY_HINTS}");
        put(buf, 0, 0, &left, status_style);

        let footer_width = u16::try_from(FOOTER_TEXT.len() + 1).unwrap_or(u16::MAX);
        let left_width = u16::try_from(left.chars().count()).unwrap_or(u16::MAX);
        if area.width > left_width.saturating_add(footer_width + 2) {
            put(
                buf,
                area.width - footer_width,
                0,
                FOOTER_TEXT,
                Style::default().fg(DIM_GRAY),
            );
        }
    }

    /// Render the detail overlay for the selected book
    fn render_detail(&mut self) {
        let Some(book) = self.shell.selected() else {
            return;
        };
        let Some(buf) = self.compositor.layer_buffer_mut(self.layers.detail) else {
            return;
        };
        draw_detail(buf, book, &mut self.detail_scroll);
    }
}

// ============================================================================
// Drawing helpers
// ============================================================================

/// Write a string, clipped to the buffer
fn put(buf: &mut Buffer, x: u16, y: u16, text: &str, style: Style) {
    let area = buf.area;
    if x < area.right() && y < area.bottom() {
        buf.set_stringn(x, y, text, usize::from(area.right() - x), style);
    }
}

/// Write a styled line, clipped to the buffer
fn put_line(buf: &mut Buffer, x: u16, y: u16, line: &Line<'_>) {
    let area = buf.area;
    if x < area.right() && y < area.bottom() {
        buf.set_line(x, y, line, area.right() - x);
    }
}

/// Centered, wrapped message starting a third of the way down
fn draw_centered(buf: &mut Buffer, lines: Vec<Line<'_>>) {
    let area = buf.area;
    let top = area.height / 3;
    let rect = Rect::new(area.x, area.y + top, area.width, area.height - top);
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(rect, buf);
}

fn star_spans(book: &Book) -> Vec<Span<'static>> {
    let stars = book.rating_stars(STAR_COUNT);
    let filled: String = stars.chars().filter(|&c| c == '★').collect();
    let empty: String = stars.chars().filter(|&c| c != '★').collect();
    vec![
        Span::styled(filled, Style::default().fg(STAR_YELLOW)),
        Span::styled(empty, Style::default().fg(STAR_EMPTY)),
    ]
}

/// Visible page of cards
fn draw_grid(buf: &mut Buffer, books: &[&Book], cursor: GridCursor, layout: &GridLayout) {
    let first = cursor.top_row() * layout.columns;

    for (slot, (position, book)) in books
        .iter()
        .enumerate()
        .skip(first)
        .take(layout.page_size())
        .enumerate()
    {
        draw_card(buf, layout.card_rect(slot), book, position == cursor.position());
    }

    if first + layout.page_size() < books.len() {
        let area = buf.area;
        let more = "▼ more ";
        put(
            buf,
            area.width.saturating_sub(7),
            area.height.saturating_sub(1),
            more,
            Style::default().fg(DIM_GRAY),
        );
    }
}

/// One card: title, author, year and stars
fn draw_card(buf: &mut Buffer, rect: Rect, book: &Book, focused: bool) {
    let border = if focused { ACCENT_TEAL } else { CARD_BORDER };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border));
    let inner = block.inner(rect);
    block.render(rect, buf);

    let width = usize::from(inner.width);
    let title_color = if focused { ACCENT_TEAL } else { TEXT_PRIMARY };
    put(
        buf,
        inner.x,
        inner.y,
        &fit_width(&book.title, width),
        Style::default().fg(title_color).add_modifier(Modifier::BOLD),
    );
    put(
        buf,
        inner.x,
        inner.y + 1,
        &fit_width(&book.author, width),
        Style::default().fg(TEXT_SECONDARY),
    );

    let year = book.published_year.to_string();
    put(buf, inner.x, inner.y + 2, &year, Style::default().fg(DIM_GRAY));
    if width >= year.len() + STAR_COUNT + 1 {
        let stars_x = inner.x + inner.width - u16::try_from(STAR_COUNT).unwrap_or(0);
        put_line(buf, stars_x, inner.y + 2, &Line::from(star_spans(book)));
    }
}

/// The detail overlay
fn draw_detail(buf: &mut Buffer, book: &Book, scroll: &mut TextBlockState) {
    buf.reset();
    let area = buf.area;
    buf.set_style(area, Style::default().bg(PANEL_BG));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_TEAL))
        .title_bottom(Line::from(" Esc close · ↑↓ scroll ").right_aligned());
    let inner = block.inner(area);
    block.render(area, buf);

    // One column of padding inside the border
    let inner = Rect::new(
        inner.x.saturating_add(1),
        inner.y,
        inner.width.saturating_sub(2),
        inner.height,
    );
    let width = usize::from(inner.width);
    let label = Style::default().fg(DIM_GRAY);
    let link = Style::default().fg(ACCENT_TEAL);
    let link_width = width.saturating_sub(7);

    let mut genres: Vec<Span<'_>> = Vec::new();
    for genre in &book.genres {
        genres.push(Span::styled(format!("[{genre}]"), Style::default().fg(GENRE_TEAL)));
        genres.push(Span::raw(" "));
    }

    let mut rating = star_spans(book);
    rating.push(Span::styled(
        format!("  {}", book.rating_label()),
        Style::default().fg(TEXT_SECONDARY),
    ));

    let free = match book.free_edition_url() {
        Some(url) => Span::styled(fit_width(&url, link_width), link),
        None => Span::styled(
            format!("download only for books published before {PUBLIC_DOMAIN_BEFORE}"),
            Style::default().fg(DIM_GRAY),
        ),
    };

    let lines = vec![
        Line::styled(
            fit_width(&book.title, width),
            Style::default().fg(TEXT_PRIMARY).add_modifier(Modifier::BOLD),
        ),
        Line::styled(fit_width(&book.author, width), Style::default().fg(TEXT_SECONDARY)),
        Line::styled(book.published_year.to_string(), label),
        Line::default(),
        Line::from(rating),
        Line::from(genres),
        Line::default(),
        Line::from(vec![
            Span::styled("Cover  ", label),
            Span::styled(fit_width(&book.cover_image_url, link_width), link),
        ]),
        Line::from(vec![
            Span::styled("Store  ", label),
            Span::styled(
                fit_width(book.store_search_url().as_deref().unwrap_or("-"), link_width),
                link,
            ),
        ]),
        Line::from(vec![Span::styled("Free   ", label), free]),
        Line::default(),
    ];

    let mut y = inner.y;
    for line in &lines {
        if y >= inner.bottom() {
            break;
        }
        put_line(buf, inner.x, y, line);
        y += 1;
    }

    let description = Rect::new(inner.x, y, inner.width, inner.bottom().saturating_sub(y));
    TextBlock::new(&book.description)
        .style(Style::default().fg(TEXT_PRIMARY))
        .render(description, buf, scroll);

    if scroll.has_more_below() && inner.height > 0 {
        put(
            buf,
            inner.right().saturating_sub(1),
            inner.bottom() - 1,
            "▼",
            Style::default().fg(DIM_GRAY),
        );
    }
}
