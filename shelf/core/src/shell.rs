//! Shell - Fetch Lifecycle and View State
//!
//! The shell owns everything a surface renders: the library, the query, the
//! sort, the selection, the fetch phase and the user-facing error. It is the
//! only writer of that state; surfaces feed it [`ShellEvent`]s and read it
//! back through accessors.
//!
//! # Fetch lifecycle
//!
//! ```text
//! Idle ──Mounted──► Loading ──ok──► Ready
//!                      │              │
//!                      └──err──► Failed
//!                                 │   │
//!        Loading ◄──RetryRequested┘   └ (Ready also retries)
//! ```
//!
//! Fetches run on a spawned task and report back over a channel. Surfaces
//! call [`Shell::poll_fetch`] every frame to apply finished fetches, the same
//! way they poll streaming tokens elsewhere. Each fetch carries a
//! [`FetchTicket`]; only the outcome for the current ticket is applied.
//!
//! # UI Agnostic
//!
//! No rendering here. The shell can drive a TUI, a GUI, or a test harness.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::book::{Book, BookId};
use crate::error::GenerationError;
use crate::library::LibrarySource;
use crate::view::{derive_view_indices, SortDirection, SortKey, SortSpec};

/// What the user is told when a fetch fails; details only go to the log
pub const LIBRARY_UNAVAILABLE: &str =
    "Failed to load the book library. The generation service might be unavailable. Please try again.";

/// Fetch lifecycle phase
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchPhase {
    /// Nothing requested yet
    #[default]
    Idle,
    /// A fetch is in flight
    Loading,
    /// The last fetch succeeded
    Ready,
    /// The last fetch failed
    Failed,
}

impl FetchPhase {
    /// Get a human-readable description
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Loading => "Generating library...",
            Self::Ready => "Ready",
            Self::Failed => "Library unavailable",
        }
    }
}

/// Events from a surface to the shell
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShellEvent {
    /// Surface is up; triggers the first fetch (once)
    Mounted,
    /// User asked to fetch the library again
    RetryRequested,
    /// Search text changed
    QueryChanged(String),
    /// Sort field changed
    SortKeyChanged(SortKey),
    /// Sort direction set explicitly
    SortDirectionChanged(SortDirection),
    /// Sort direction flipped
    SortDirectionToggled,
    /// User picked a book
    BookSelected(BookId),
    /// User closed the detail overlay
    SelectionDismissed,
}

/// Identifies one fetch attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FetchTicket(u64);

/// A finished fetch, as reported by the spawned task
#[derive(Debug)]
struct FetchOutcome {
    ticket: FetchTicket,
    result: Result<Vec<Book>, GenerationError>,
}

/// What the main area should show
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShellStatus {
    /// Nothing requested yet
    Idle,
    /// Fetch in flight
    Loading,
    /// Last fetch failed; show the error
    Failed,
    /// Library is loaded but nothing matches the query
    NoMatches,
    /// Books to show
    Showing(usize),
}

/// The shell
pub struct Shell<S: LibrarySource + 'static> {
    /// Where libraries come from
    source: Arc<S>,
    /// Current lifecycle phase
    phase: FetchPhase,
    /// Current library, replaced wholesale on each successful fetch
    library: Vec<Book>,
    /// Derived view, as positions into `library`
    view: Vec<usize>,
    /// Search text
    query: String,
    /// Sort settings
    sort: SortSpec,
    /// Selected book (always a member of `library`)
    selected: Option<BookId>,
    /// User-facing error
    error: Option<String>,
    /// Whether the initial fetch was triggered
    mounted: bool,
    /// Ticket of the fetch in flight
    in_flight: Option<FetchTicket>,
    /// Next ticket number
    next_ticket: u64,
    /// Channel the fetch tasks report on
    outcome_tx: mpsc::Sender<FetchOutcome>,
    outcome_rx: mpsc::Receiver<FetchOutcome>,
}

impl<S: LibrarySource + 'static> Shell<S> {
    /// Create a new shell over a library source
    pub fn new(source: S) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::channel(8);
        Self {
            source: Arc::new(source),
            phase: FetchPhase::Idle,
            library: Vec::new(),
            view: Vec::new(),
            query: String::new(),
            sort: SortSpec::default(),
            selected: None,
            error: None,
            mounted: false,
            in_flight: None,
            next_ticket: 0,
            outcome_tx,
            outcome_rx,
        }
    }

    /// Get current phase
    pub fn phase(&self) -> FetchPhase {
        self.phase
    }

    /// Whether a fetch is in flight
    pub fn is_loading(&self) -> bool {
        self.phase == FetchPhase::Loading
    }

    /// The whole library, in the order the service returned it
    pub fn library(&self) -> &[Book] {
        &self.library
    }

    /// Whether any library has been loaded
    pub fn has_library(&self) -> bool {
        !self.library.is_empty()
    }

    /// The derived view, in display order
    pub fn view(&self) -> Vec<&Book> {
        self.view.iter().map(|&i| &self.library[i]).collect()
    }

    /// Number of books in the derived view
    pub fn view_len(&self) -> usize {
        self.view.len()
    }

    /// Book at a position of the derived view
    pub fn view_book(&self, position: usize) -> Option<&Book> {
        self.view.get(position).map(|&i| &self.library[i])
    }

    /// Current search text
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Current sort settings
    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    /// The selected book, if any
    pub fn selected(&self) -> Option<&Book> {
        let id = self.selected.as_ref()?;
        self.library.iter().find(|b| &b.id == id)
    }

    /// User-facing error message, if the last fetch failed
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Ticket of the fetch in flight
    pub fn pending_fetch(&self) -> Option<FetchTicket> {
        self.in_flight
    }

    /// What the main area should show
    pub fn status(&self) -> ShellStatus {
        match self.phase {
            FetchPhase::Idle => ShellStatus::Idle,
            FetchPhase::Loading => ShellStatus::Loading,
            FetchPhase::Failed => ShellStatus::Failed,
            FetchPhase::Ready if self.view.is_empty() => ShellStatus::NoMatches,
            FetchPhase::Ready => ShellStatus::Showing(self.view.len()),
        }
    }

    /// Handle an event from the surface
    pub fn handle_event(&mut self, event: ShellEvent) {
        match event {
            ShellEvent::Mounted => {
                if self.mounted {
                    tracing::debug!("Shell already mounted, ignoring");
                    return;
                }
                self.mounted = true;
                self.start_fetch();
            }

            ShellEvent::RetryRequested => {
                self.mounted = true;
                self.start_fetch();
            }

            ShellEvent::QueryChanged(query) => {
                if query != self.query {
                    self.query = query;
                    self.recompute_view();
                }
            }

            ShellEvent::SortKeyChanged(key) => {
                self.sort.key = key;
                self.recompute_view();
            }

            ShellEvent::SortDirectionChanged(direction) => {
                self.sort.direction = direction;
                self.recompute_view();
            }

            ShellEvent::SortDirectionToggled => {
                self.sort.direction = self.sort.direction.toggle();
                self.recompute_view();
            }

            ShellEvent::BookSelected(id) => {
                if self.library.iter().any(|b| b.id == id) {
                    self.selected = Some(id);
                } else {
                    tracing::warn!(id = %id, "Ignoring selection of a book not in the library");
                }
            }

            ShellEvent::SelectionDismissed => {
                self.selected = None;
            }
        }
    }

    /// Apply any finished fetches (non-blocking)
    ///
    /// Call this regularly. Returns true if state changed.
    pub fn poll_fetch(&mut self) -> bool {
        let mut changed = false;
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            changed |= self.apply_outcome(outcome);
        }
        changed
    }

    /// Wait for the fetch in flight to finish and apply it
    ///
    /// Returns false immediately if nothing is in flight.
    pub async fn wait_for_fetch(&mut self) -> bool {
        while self.in_flight.is_some() {
            match self.outcome_rx.recv().await {
                Some(outcome) => {
                    if self.apply_outcome(outcome) {
                        return true;
                    }
                }
                None => return false,
            }
        }
        false
    }

    /// Spawn a fetch unless one is already in flight
    fn start_fetch(&mut self) -> Option<FetchTicket> {
        if let Some(ticket) = self.in_flight {
            tracing::info!(?ticket, "Fetch already in progress, ignoring request");
            return None;
        }

        let ticket = FetchTicket(self.next_ticket);
        self.next_ticket += 1;
        self.in_flight = Some(ticket);
        self.phase = FetchPhase::Loading;
        self.error = None;

        tracing::info!(?ticket, "Fetching library");

        let source = Arc::clone(&self.source);
        let tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            // A source that panics still yields an outcome for this ticket
            let result = match tokio::spawn(async move { source.fetch_library().await }).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!(?ticket, error = %e, "Library fetch task did not complete");
                    Err(GenerationError::Aborted(e.to_string()))
                }
            };
            if tx.send(FetchOutcome { ticket, result }).await.is_err() {
                tracing::debug!(?ticket, "Shell dropped before fetch completed");
            }
        });

        Some(ticket)
    }

    /// Apply one finished fetch; stale tickets are dropped
    fn apply_outcome(&mut self, outcome: FetchOutcome) -> bool {
        if self.in_flight != Some(outcome.ticket) {
            tracing::debug!(ticket = ?outcome.ticket, "Discarding stale fetch result");
            return false;
        }
        self.in_flight = None;

        match outcome.result {
            Ok(books) => {
                tracing::info!(count = books.len(), "Library replaced");
                self.library = books;
                self.selected = None;
                self.error = None;
                self.phase = FetchPhase::Ready;
                self.recompute_view();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Library fetch failed");
                self.error = Some(LIBRARY_UNAVAILABLE.to_string());
                self.phase = FetchPhase::Failed;
            }
        }
        true
    }

    fn recompute_view(&mut self) {
        self.view = derive_view_indices(&self.library, &self.query, self.sort);
    }
}
