//! Integration Tests for the storyshelf TUI
//!
//! Drives the App with synthetic key events against ratatui's
//! `TestBackend` and checks what ends up on screen. Library sources are
//! mocks, so no network is involved.
//!
//! # Test Coverage
//!
//! 1. **Screens**: loading, error with retry hint, empty search, card grid
//! 2. **Key map**: search editing, sort cycling, grid navigation, quit keys
//! 3. **Detail overlay**: open, scroll, close
//! 4. **Resize**: grid reflows without losing the focused book

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use tokio::time::timeout;

use shelf_core::{Book, BookId, GenerationError, LibrarySource, SortDirection, SortKey};
use storyshelf_tui::{App, InputMode};

// ============================================================================
// Mock Sources
// ============================================================================

/// Replays queued results, then fails
struct ScriptedSource {
    results: Mutex<VecDeque<Result<Vec<Book>, GenerationError>>>,
}

impl ScriptedSource {
    fn new(results: Vec<Result<Vec<Book>, GenerationError>>) -> Self {
        Self {
            results: Mutex::new(results.into()),
        }
    }

    fn ok(books: Vec<Book>) -> Self {
        Self::new(vec![Ok(books)])
    }
}

#[async_trait]
impl LibrarySource for ScriptedSource {
    async fn fetch_library(&self) -> Result<Vec<Book>, GenerationError> {
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(GenerationError::EmptyLibrary))
    }
}

/// Never answers
struct PendingSource;

#[async_trait]
impl LibrarySource for PendingSource {
    async fn fetch_library(&self) -> Result<Vec<Book>, GenerationError> {
        std::future::pending().await
    }
}

// ============================================================================
// Helpers
// ============================================================================

const WIDTH: u16 = 100;
const HEIGHT: u16 = 30;

fn book(id: &str, title: &str, author: &str, year: i32) -> Book {
    Book {
        id: BookId::from(id),
        title: title.to_string(),
        author: author.to_string(),
        cover_image_url: format!("https://picsum.photos/seed/{id}/400/600"),
        description: format!("{title} is a novel by {author}."),
        genres: vec!["Fantasy".to_string(), "Classic Literature".to_string()],
        rating: 4.0,
        published_year: year,
    }
}

fn library() -> Vec<Book> {
    vec![
        book("dune", "Dune", "Herbert", 1965),
        book("hobbit", "Hobbit", "Tolkien", 1937),
        book("emma", "Emma", "Austen", 1815),
    ]
}

fn terminal() -> Terminal<TestBackend> {
    Terminal::new(TestBackend::new(WIDTH, HEIGHT)).unwrap()
}

fn new_app<S: LibrarySource + 'static>(source: S) -> App<S> {
    App::new(source, Rect::new(0, 0, WIDTH, HEIGHT))
}

async fn loaded_app<S: LibrarySource + 'static>(source: S) -> App<S> {
    let mut app = new_app(source);
    app.start();
    timeout(Duration::from_secs(5), app.wait_for_fetch())
        .await
        .expect("fetch did not finish");
    app
}

fn press<S: LibrarySource + 'static>(app: &mut App<S>, code: KeyCode) {
    app.handle_terminal_event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
}

fn type_text<S: LibrarySource + 'static>(app: &mut App<S>, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

/// Render and return the screen as text, one line per row
fn screen<S: LibrarySource + 'static>(
    app: &mut App<S>,
    terminal: &mut Terminal<TestBackend>,
) -> String {
    app.render(terminal).unwrap();
    let buf = terminal.backend().buffer();
    (0..buf.area.height)
        .map(|y| {
            (0..buf.area.width)
                .filter_map(|x| buf.cell((x, y)).map(|c| c.symbol().to_string()))
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ============================================================================
// Screens
// ============================================================================

#[tokio::test]
async fn test_loading_screen_while_fetching() {
    let mut app = new_app(PendingSource);
    let mut terminal = terminal();

    app.start();
    let text = screen(&mut app, &mut terminal);

    assert!(text.contains("Generating Your Library..."));
    assert!(text.contains("storyshelf"));
}

#[tokio::test]
async fn test_grid_shows_books_sorted_by_title() {
    let mut app = loaded_app(ScriptedSource::ok(library())).await;
    let mut terminal = terminal();

    let text = screen(&mut app, &mut terminal);

    assert!(text.contains("Dune"));
    assert!(text.contains("Hobbit"));
    assert!(text.contains("Tolkien"));
    assert!(text.contains("3 of 3 books"));
    assert!(text.contains("Sort: Title ↑"));
    assert!(text.contains("Powered by Gemini API"));
    assert_eq!(app.focused_book().unwrap().title, "Dune");
}

#[tokio::test]
async fn test_failure_shows_error_and_retry_hint() {
    let mut app = loaded_app(ScriptedSource::new(vec![Err(GenerationError::EmptyLibrary)])).await;
    let mut terminal = terminal();

    let text = screen(&mut app, &mut terminal);

    assert!(text.contains("Failed to load the book library"));
    assert!(text.contains("Press r to try again"));
    assert!(app.focused_book().is_none());
}

#[tokio::test]
async fn test_retry_key_recovers_from_failure() {
    let mut app = loaded_app(ScriptedSource::new(vec![
        Err(GenerationError::EmptyLibrary),
        Ok(library()),
    ]))
    .await;
    let mut terminal = terminal();

    press(&mut app, KeyCode::Char('r'));
    assert!(screen(&mut app, &mut terminal).contains("Generating Your Library..."));

    timeout(Duration::from_secs(5), app.wait_for_fetch())
        .await
        .unwrap();
    let text = screen(&mut app, &mut terminal);
    assert!(text.contains("Emma"));
    assert!(!text.contains("Failed to load"));
}

#[tokio::test]
async fn test_search_with_no_matches() {
    let mut app = loaded_app(ScriptedSource::ok(library())).await;
    let mut terminal = terminal();

    press(&mut app, KeyCode::Char('/'));
    type_text(&mut app, "zzz");

    let text = screen(&mut app, &mut terminal);
    assert!(text.contains("No books found matching your search."));
    assert!(text.contains("0 of 3 books"));
}

// ============================================================================
// Key map
// ============================================================================

#[tokio::test]
async fn test_search_mode_edits_query_live() {
    let mut app = loaded_app(ScriptedSource::ok(library())).await;
    let mut terminal = terminal();

    press(&mut app, KeyCode::Char('/'));
    assert_eq!(app.mode(), InputMode::Search);

    // 'q' is text while searching, not quit
    type_text(&mut app, "herbq");
    assert!(app.is_running());
    assert_eq!(app.shell().query(), "herbq");

    press(&mut app, KeyCode::Backspace);
    assert_eq!(app.shell().query(), "herb");
    assert_eq!(app.shell().view_len(), 1);

    press(&mut app, KeyCode::Enter);
    assert_eq!(app.mode(), InputMode::Browse);

    let text = screen(&mut app, &mut terminal);
    assert!(text.contains("Search: herb"));
    assert!(text.contains("Dune"));
    assert!(!text.contains("Hobbit"));
}

#[tokio::test]
async fn test_sort_keys_cycle_and_toggle() {
    let mut app = loaded_app(ScriptedSource::ok(library())).await;
    let mut terminal = terminal();

    press(&mut app, KeyCode::Char('s'));
    assert_eq!(app.shell().sort().key, SortKey::Author);
    assert_eq!(app.focused_book().unwrap().author, "Austen");

    press(&mut app, KeyCode::Char('s'));
    assert_eq!(app.shell().sort().key, SortKey::PublishedYear);

    press(&mut app, KeyCode::Char('d'));
    assert_eq!(app.shell().sort().direction, SortDirection::Descending);
    assert_eq!(app.focused_book().unwrap().title, "Dune");

    assert!(screen(&mut app, &mut terminal).contains("Sort: Year ↓"));
}

#[tokio::test]
async fn test_arrow_and_vim_keys_move_focus() {
    let mut app = loaded_app(ScriptedSource::ok(library())).await;

    press(&mut app, KeyCode::Right);
    assert_eq!(app.cursor_position(), 1);
    press(&mut app, KeyCode::Char('l'));
    assert_eq!(app.cursor_position(), 2);
    // End of the view
    press(&mut app, KeyCode::Char('l'));
    assert_eq!(app.cursor_position(), 2);
    press(&mut app, KeyCode::Char('h'));
    assert_eq!(app.cursor_position(), 1);
    press(&mut app, KeyCode::Home);
    assert_eq!(app.cursor_position(), 0);
    press(&mut app, KeyCode::End);
    assert_eq!(app.cursor_position(), 2);
}

#[tokio::test]
async fn test_quit_keys() {
    let mut app = loaded_app(ScriptedSource::ok(library())).await;
    press(&mut app, KeyCode::Char('q'));
    assert!(!app.is_running());

    let mut app = loaded_app(ScriptedSource::ok(library())).await;
    app.handle_terminal_event(Event::Key(KeyEvent::new(
        KeyCode::Char('c'),
        KeyModifiers::CONTROL,
    )));
    assert!(!app.is_running());

    let mut app = loaded_app(ScriptedSource::ok(library())).await;
    press(&mut app, KeyCode::Esc);
    assert!(!app.is_running());
}

// ============================================================================
// Detail overlay
// ============================================================================

#[tokio::test]
async fn test_enter_opens_detail_and_esc_closes() {
    let mut app = loaded_app(ScriptedSource::ok(library())).await;
    let mut terminal = terminal();

    // Title order: Dune, Emma, Hobbit
    press(&mut app, KeyCode::Right);
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.shell().selected().unwrap().title, "Emma");

    let text = screen(&mut app, &mut terminal);
    assert!(text.contains("Emma is a novel by Austen."));
    assert!(text.contains("4.0 / 5.0"));
    assert!(text.contains("[Fantasy]"));
    assert!(text.contains("https://www.gutenberg.org/ebooks/search/"));

    // Esc closes the overlay, it does not quit
    press(&mut app, KeyCode::Esc);
    assert!(app.is_running());
    assert!(app.shell().selected().is_none());
    assert!(!screen(&mut app, &mut terminal).contains("is a novel by"));
}

#[tokio::test]
async fn test_detail_without_free_edition() {
    let mut app = loaded_app(ScriptedSource::ok(library())).await;
    let mut terminal = terminal();

    press(&mut app, KeyCode::Enter);
    assert_eq!(app.shell().selected().unwrap().title, "Dune");

    let text = screen(&mut app, &mut terminal);
    assert!(text.contains("download only for books published before 1928"));
    assert!(text.contains("https://www.amazon.com/s?k=Dune+Herbert"));
}

#[tokio::test]
async fn test_detail_keys_do_not_reach_grid() {
    let mut app = loaded_app(ScriptedSource::ok(library())).await;

    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Char('s'));
    press(&mut app, KeyCode::Down);

    assert_eq!(app.shell().sort().key, SortKey::Title);
    assert_eq!(app.cursor_position(), 0);
    assert!(app.shell().selected().is_some());
}

// ============================================================================
// Resize
// ============================================================================

#[tokio::test]
async fn test_resize_keeps_focus() {
    let mut app = loaded_app(ScriptedSource::ok(library())).await;

    press(&mut app, KeyCode::End);
    app.handle_terminal_event(Event::Resize(30, 20));
    assert_eq!(app.cursor_position(), 2);

    let mut terminal = Terminal::new(TestBackend::new(30, 20)).unwrap();
    app.render(&mut terminal).unwrap();
    let buf = terminal.backend().buffer();
    let text: String = (0..buf.area.height)
        .flat_map(|y| (0..buf.area.width).map(move |x| (x, y)))
        .filter_map(|pos| buf.cell(pos).map(|c| c.symbol().to_string()))
        .collect();
    assert!(text.contains("Hobbit"));
}
