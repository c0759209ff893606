//! # Controller Module
//!
//! The single owner of all client state: catalog snapshots, favorites, the
//! current input text, and the user-visible notice.
//!
//! User actions arrive as typed [`Command`]s. A command is handled
//! synchronously and yields at most one [`FetchRequest`] for the remote API.
//! The caller performs the request and hands the outcome back through
//! [`Controller::complete`].
//!
//! ## Ordering
//!
//! Every request carries a [`Ticket`] from a monotonically increasing
//! sequence. Only the most recently issued request may change the display:
//! a completion for any older ticket is discarded as stale, whatever order
//! the responses arrive in. Searches answered locally supersede an in-flight
//! search the same way.
//!
//! Loads of the unfiltered catalog are tracked apart from searches. A
//! refresh always replaces the base catalog unless a newer refresh makes it
//! stale. It replaces the display only while the display shows the base and
//! no search is outstanding.

use crate::catalog::{CatalogStore, SearchPlan};
use crate::favorites::FavoritesStore;
use crate::primitives::MAX_QUERY_LENGTH;
use crate::query::{QueryEngine, QueryOptions};
use crate::{Catalog, FavoriteSet, FetchError, MarqueeError, Movie, MovieId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// =============================================================================
// COMMANDS & REQUESTS
// =============================================================================

/// A user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// The search box text changed.
    Input(String),
    /// The search form was submitted.
    Search(String),
    /// Reload the unfiltered catalog from the source.
    Refresh,
    /// The favorite button of a movie was pressed.
    ToggleFavorite(MovieId),
    /// The notice was dismissed.
    DismissNotice,
}

/// Sequence number of an issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    /// Raw sequence number.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// The remote operation a request needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchKind {
    /// `getPopularMovies`
    Popular,
    /// `searchMovies(query)`
    Search(String),
}

/// A remote call the caller must perform and report back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub ticket: Ticket,
    pub kind: FetchKind,
}

/// What `complete` did with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The response replaced the displayed catalog.
    Applied { count: usize },
    /// The response replaced the unfiltered catalog only; a newer search
    /// owns the display.
    BaseUpdated { count: usize },
    /// A newer request superseded this one; the response was dropped.
    Stale,
    /// The request failed; the previous catalog stays displayed.
    Failed,
}

// =============================================================================
// NOTICE & VIEW
// =============================================================================

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A non-blocking message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Everything the presentation layer needs to render, as one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    /// Current search box text.
    pub query: String,
    /// Displayed movies: the current snapshot filtered by `query`.
    pub movies: Catalog,
    /// Favorite ids.
    pub favorites: FavoriteSet,
    /// Pending notice, if any.
    pub notice: Option<Notice>,
    /// Whether a request is outstanding.
    pub loading: bool,
}

impl View {
    /// Whether `id` is a favorite.
    #[must_use]
    pub fn is_favorite(&self, id: MovieId) -> bool {
        self.favorites.contains(id)
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

/// Controller behavior switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerOptions {
    /// Folding and whitespace rules for filtering.
    #[serde(flatten)]
    pub query: QueryOptions,
    /// Empty the search box after a submission.
    pub clear_on_submit: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            query: QueryOptions::default(),
            clear_on_submit: true,
        }
    }
}

/// Owner of all client state.
#[derive(Debug)]
pub struct Controller {
    catalog: CatalogStore,
    favorites: FavoritesStore,
    engine: QueryEngine,
    clear_on_submit: bool,
    input: String,
    notice: Option<Notice>,
    next_ticket: u64,
    refresh: Option<Ticket>,
    search: Option<(Ticket, String)>,
    follows_base: bool,
}

const SAVE_WARNING: &str = "Favorites could not be saved; changes are kept for this session";

impl Default for Controller {
    fn default() -> Self {
        Self::new(
            CatalogStore::default(),
            FavoritesStore::new(),
            ControllerOptions::default(),
        )
    }
}

impl Controller {
    /// Create a controller over the given stores.
    #[must_use]
    pub fn new(
        catalog: CatalogStore,
        favorites: FavoritesStore,
        options: ControllerOptions,
    ) -> Self {
        Self {
            catalog,
            favorites,
            engine: QueryEngine::with_options(options.query),
            clear_on_submit: options.clear_on_submit,
            input: String::new(),
            notice: None,
            next_ticket: 0,
            refresh: None,
            search: None,
            follows_base: true,
        }
    }

    /// Controller over the seed catalog with volatile favorites.
    #[must_use]
    pub fn seeded() -> Self {
        Self::new(
            CatalogStore::seeded(),
            FavoritesStore::new(),
            ControllerOptions::default(),
        )
    }

    // =========================================================================
    // COMMAND DISPATCH
    // =========================================================================

    /// Apply a command. Returns the remote call it requires, if any.
    pub fn dispatch(&mut self, command: Command) -> Option<FetchRequest> {
        match command {
            Command::Input(text) => {
                self.input = text;
                None
            }
            Command::Search(query) => self.submit(query),
            Command::Refresh => Some(self.issue(FetchKind::Popular)),
            Command::ToggleFavorite(id) => {
                self.favorites.toggle(id);
                if self.favorites.is_dirty() {
                    self.notice = Some(Notice::warning(SAVE_WARNING));
                } else {
                    self.clear_save_warning();
                }
                None
            }
            Command::DismissNotice => {
                self.notice = None;
                None
            }
        }
    }

    fn submit(&mut self, raw: String) -> Option<FetchRequest> {
        let query = self.engine.effective_query(&raw).to_string();
        if query.len() > MAX_QUERY_LENGTH {
            let err = MarqueeError::QueryTooLong(query.len());
            self.notice = Some(Notice::warning(err.to_string()));
            return None;
        }

        if self.clear_on_submit {
            self.input.clear();
        }

        match self.catalog.search(&query) {
            SearchPlan::Local(base) => {
                self.supersede();
                self.catalog.replace_current(base);
                self.follows_base = true;
                None
            }
            SearchPlan::Remote(query) => Some(self.issue(FetchKind::Search(query))),
        }
    }

    fn next(&mut self) -> Ticket {
        let ticket = Ticket(self.next_ticket);
        self.next_ticket = self.next_ticket.saturating_add(1);
        ticket
    }

    fn issue(&mut self, kind: FetchKind) -> FetchRequest {
        let ticket = self.next();
        // A refresh displays its result, so it supersedes any search too.
        let previous = match &kind {
            FetchKind::Popular => {
                self.follows_base = true;
                let search = self.search.take().map(|(t, _)| t);
                self.refresh.replace(ticket).or(search)
            }
            FetchKind::Search(query) => self
                .search
                .replace((ticket, query.clone()))
                .map(|(t, _)| t),
        };
        if let Some(previous) = previous {
            tracing::debug!(
                superseded = previous.value(),
                ticket = ticket.value(),
                "request superseded"
            );
        }
        FetchRequest { ticket, kind }
    }

    /// Invalidate an in-flight search without issuing a new request.
    fn supersede(&mut self) {
        if let Some((previous, _)) = self.search.take() {
            tracing::debug!(superseded = previous.value(), "request superseded");
        }
    }

    fn clear_save_warning(&mut self) {
        if matches!(&self.notice, Some(n) if n.message == SAVE_WARNING) {
            self.notice = None;
        }
    }

    // =========================================================================
    // COMPLETION
    // =========================================================================

    /// Apply the outcome of a request previously returned by `dispatch`.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        result: Result<Catalog, FetchError>,
    ) -> Completion {
        let kind = if self.refresh == Some(ticket) {
            self.refresh = None;
            FetchKind::Popular
        } else {
            match self.search.take() {
                Some((current, query)) if current == ticket => FetchKind::Search(query),
                other => {
                    self.search = other;
                    tracing::debug!(ticket = ticket.value(), "discarding stale response");
                    return Completion::Stale;
                }
            }
        };

        match result {
            Ok(catalog) => {
                let count = catalog.len();
                let outcome = match kind {
                    FetchKind::Popular if self.follows_base && self.search.is_none() => {
                        self.catalog.replace_base(catalog);
                        Completion::Applied { count }
                    }
                    FetchKind::Popular => {
                        self.catalog.set_base(catalog);
                        Completion::BaseUpdated { count }
                    }
                    FetchKind::Search(_) => {
                        self.catalog.replace_current(catalog);
                        self.follows_base = false;
                        Completion::Applied { count }
                    }
                };
                let applied = matches!(outcome, Completion::Applied { .. });
                if applied && matches!(&self.notice, Some(n) if n.level == NoticeLevel::Error) {
                    self.notice = None;
                }
                tracing::debug!(ticket = ticket.value(), count, ?outcome, "catalog applied");
                outcome
            }
            Err(e) => {
                tracing::warn!(ticket = ticket.value(), error = %e, "fetch failed");
                let message = match kind {
                    FetchKind::Popular => format!("Could not load movies: {}", e),
                    FetchKind::Search(q) => format!("Search for \"{}\" failed: {}", q, e),
                };
                self.notice = Some(Notice::error(message));
                Completion::Failed
            }
        }
    }

    // =========================================================================
    // READ ACCESS
    // =========================================================================

    /// Render state for the presentation layer.
    #[must_use]
    pub fn view(&self) -> View {
        View {
            query: self.input.clone(),
            movies: self.engine.filter(self.catalog.snapshot(), &self.input),
            favorites: self.favorites.list(),
            notice: self.notice.clone(),
            loading: self.is_loading(),
        }
    }

    /// Favorite movies among the known catalogs.
    ///
    /// Base catalog order first, then favorites only present in the
    /// displayed snapshot. An empty result is the "no favorites" state.
    #[must_use]
    pub fn favorite_movies(&self) -> Vec<Movie> {
        let favorites = self.favorites.favorites();
        let mut seen = BTreeSet::new();
        self.catalog
            .base()
            .iter()
            .chain(self.catalog.snapshot().iter())
            .filter(|m| favorites.contains(m.id) && seen.insert(m.id))
            .cloned()
            .collect()
    }

    /// Retry saving favorites after a failed write. No-op when clean.
    pub fn flush_favorites(&mut self) -> Result<(), MarqueeError> {
        if self.favorites.is_dirty() {
            self.favorites.flush()?;
            self.clear_save_warning();
            tracing::info!(count = self.favorites.favorites().len(), "favorites flushed");
        }
        Ok(())
    }

    /// Whether a request is outstanding.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.refresh.is_some() || self.search.is_some()
    }

    /// Current search box text.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Pending notice.
    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// The catalog store.
    #[must_use]
    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    /// The favorites store.
    #[must_use]
    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    /// The query engine.
    #[must_use]
    pub fn engine(&self) -> &QueryEngine {
        &self.engine
    }
}

// =============================================================================
// TESTS
// =============================================================================
