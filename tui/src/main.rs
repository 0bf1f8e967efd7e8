//! storyshelf Entry Point
//!
//! Launches the terminal UI for browsing a generated book library.
//!
//! Usage:
//!   API_KEY=... storyshelf
//!
//! Environment:
//!   API_KEY / GEMINI_API_KEY   Generation service credential (required)
//!   STORYSHELF_MODEL           Model identifier
//!   STORYSHELF_BOOK_COUNT      Books per fetch (1-100)
//!   STORYSHELF_TIMEOUT_SECS    Request timeout
//!   STORYSHELF_ENDPOINT        Service base URL
//!   STORYSHELF_CONFIG          Config file path
//!   RUST_LOG                   Log filter (logs go to the cache directory)

use std::fs::{self, OpenOptions};
use std::io::{self, IsTerminal};
use std::panic;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shelf_core::{GeminiBackend, LibraryClient, ShelfConfig};
use storyshelf_tui::App;

/// Log filter when RUST_LOG is unset
const DEFAULT_LOG_FILTER: &str = "storyshelf_tui=info,shelf_core=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // The terminal belongs to the UI, so logs go to a file
    let log_path = init_logging()?;

    let config = match ShelfConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Configuration failed");
            eprintln!("❌ Error: {e}");
            eprintln!();
            eprintln!("Set API_KEY (or GEMINI_API_KEY) to a generation service key, e.g.:");
            eprintln!("  API_KEY=... storyshelf");
            std::process::exit(1);
        }
    };

    tracing::info!(
        model = %config.model,
        book_count = config.book_count,
        timeout_secs = config.request_timeout.as_secs(),
        source = %config.source,
        "Configuration loaded"
    );

    // Check if we have a TTY before attempting initialization
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("❌ Error: storyshelf requires a terminal (TTY)");
        eprintln!();
        eprintln!("This usually means:");
        eprintln!("  • Running in a non-interactive environment (CI, container)");
        eprintln!("  • SSH without -t flag");
        eprintln!("  • Piped stdin/stdout");
        std::process::exit(1);
    }

    let backend = GeminiBackend::from_config(&config).context("Failed to create HTTP client")?;
    let client = LibraryClient::new(backend, (&config).into());

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let size = terminal.size()?;
    let mut app = App::new(client, Rect::new(0, 0, size.width, size.height));
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!(error = %e, "storyshelf exited with an error");
        eprintln!("Logs: {}", log_path.display());
    }

    result
}

/// Install the tracing subscriber, writing to the cache directory
fn init_logging() -> anyhow::Result<PathBuf> {
    let dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("storyshelf");
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let path = dir.join("storyshelf.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(filter)
        .init();

    Ok(path)
}
