//! Movie browser state management.

use moviez_api::pagination::{PageAction, PageState};
use moviez_api::tmdb::{Genre, ListingView, MAX_PAGE, Movie, MoviePage};

/// Fetch status of the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing requested yet.
    Idle,
    /// A request for the current page is in flight.
    Loading,
    /// The current page arrived.
    Loaded,
    /// The last request failed with this message.
    Failed(String),
}

/// Input mode for the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode.
    Normal,
    /// Typing a search query.
    Search,
    /// Typing a page number.
    Goto,
}

/// Currently focused pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePane {
    /// Movie card grid.
    Movies,
    /// Genre filter panel (left).
    Genres,
}

/// Color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    /// Light background.
    Light,
    /// Dark background.
    Dark,
}

impl Theme {
    /// Returns the other theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Genre filter panel state.
#[derive(Debug, Clone, Default)]
pub struct GenrePanel {
    /// All genres from the API.
    pub genres: Vec<Genre>,
    /// Cursor position in `genres`.
    pub cursor: usize,
    /// Selected genre IDs, in the order they were picked.
    pub selected: Vec<u32>,
    /// Error from loading the genre list, if any.
    pub error: Option<String>,
}

impl GenrePanel {
    /// Whether `genre_id` is selected.
    #[must_use]
    pub fn is_selected(&self, genre_id: u32) -> bool {
        self.selected.contains(&genre_id)
    }

    /// Toggles the genre under the cursor.
    pub fn toggle_current(&mut self) {
        let Some(genre) = self.genres.get(self.cursor) else {
            return;
        };
        let id = genre.id;
        if let Some(pos) = self.selected.iter().position(|g| *g == id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(id);
        }
    }
}

/// State for the movie browser TUI.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct BrowserState {
    /// Listing currently shown.
    pub view: ListingView,
    /// Position in the paged result set.
    pub page: PageState,
    /// Fetch status of the current page.
    pub load: LoadState,
    /// Movies on the current page.
    pub movies: Vec<Movie>,
    /// Total results reported for the listing.
    pub total_results: u32,
    /// Selected card index into `movies`.
    pub selected: usize,
    /// Number of card columns in the grid.
    pub columns: usize,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Text typed in search/goto mode.
    pub input: String,
    /// Currently focused pane.
    pub active_pane: ActivePane,
    /// Genre filter panel.
    pub genre_panel: GenrePanel,
    /// Color theme.
    pub theme: Theme,
    /// Image service base URL for poster links.
    pub image_base_url: String,
}

impl BrowserState {
    /// Creates a new state showing page 1 of `view`.
    #[must_use]
    pub fn new(view: ListingView, image_base_url: impl Into<String>) -> Self {
        Self {
            view,
            page: PageState::default(),
            load: LoadState::Idle,
            movies: Vec::new(),
            total_results: 0,
            selected: 0,
            columns: 1,
            input_mode: InputMode::Normal,
            input: String::new(),
            active_pane: ActivePane::Movies,
            genre_panel: GenrePanel::default(),
            theme: Theme::Dark,
            image_base_url: image_base_url.into(),
        }
    }

    /// Marks the current page as being fetched.
    pub fn begin_loading(&mut self) {
        self.load = LoadState::Loading;
    }

    /// Applies the outcome of a page fetch.
    ///
    /// On failure the previously shown movies stay in place.
    pub fn apply_page(&mut self, result: Result<MoviePage, String>) {
        match result {
            Ok(page) => {
                self.page = PageState::new(page.page.max(1), page.total_pages.min(MAX_PAGE));
                self.total_results = page.total_results;
                self.movies = page.results;
                self.selected = 0;
                self.load = LoadState::Loaded;
            }
            Err(message) => {
                self.load = LoadState::Failed(message);
            }
        }
    }

    /// Applies the outcome of the genre list fetch.
    pub fn apply_genres(&mut self, result: Result<Vec<Genre>, String>) {
        match result {
            Ok(genres) => {
                self.genre_panel.genres = genres;
                self.genre_panel.error = None;
            }
            Err(message) => self.genre_panel.error = Some(message),
        }
    }

    /// Returns the selected movie (if any).
    #[must_use]
    pub fn selected_movie(&self) -> Option<&Movie> {
        self.movies.get(self.selected)
    }

    /// Sets the grid column count (at least 1).
    pub fn set_columns(&mut self, columns: usize) {
        self.columns = columns.max(1);
    }

    /// Handles a pagination action. Returns `true` if a fetch is needed.
    pub fn change_page(&mut self, action: PageAction) -> bool {
        match self.page.resolve(action) {
            Some(page) if page != self.page.current_page => {
                self.page.current_page = page;
                true
            }
            Some(_) | None => false,
        }
    }

    /// Switches to another listing at page 1. Returns `true` (fetch needed).
    pub fn switch_view(&mut self, view: ListingView) -> bool {
        tracing::debug!(title = %view.title, "Switching listing");
        self.view = view;
        self.page = PageState::default();
        self.selected = 0;
        self.active_pane = ActivePane::Movies;
        true
    }

    /// Opens the similar-movies listing for the selected card.
    pub fn show_similar(&mut self) -> bool {
        let Some(movie_id) = self.selected_movie().map(|m| m.id) else {
            return false;
        };
        self.switch_view(ListingView::similar(movie_id))
    }

    /// Moves the card cursor one column left.
    pub const fn move_left(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Moves the card cursor one column right.
    pub fn move_right(&mut self) {
        let next = self.selected.saturating_add(1);
        if next < self.movies.len() {
            self.selected = next;
        }
    }

    /// Moves the card cursor one row up.
    pub fn move_up(&mut self) {
        if self.active_pane == ActivePane::Genres {
            self.genre_panel.cursor = self.genre_panel.cursor.saturating_sub(1);
            return;
        }
        if self.selected >= self.columns {
            self.selected = self.selected.saturating_sub(self.columns);
        }
    }

    /// Moves the card cursor one row down.
    pub fn move_down(&mut self) {
        if self.active_pane == ActivePane::Genres {
            let next = self.genre_panel.cursor.saturating_add(1);
            if next < self.genre_panel.genres.len() {
                self.genre_panel.cursor = next;
            }
            return;
        }
        let next = self.selected.saturating_add(self.columns);
        if next < self.movies.len() {
            self.selected = next;
        }
    }

    /// Focuses the genre panel.
    pub const fn focus_genres(&mut self) {
        self.active_pane = ActivePane::Genres;
    }

    /// Focuses the movie grid.
    pub const fn focus_movies(&mut self) {
        self.active_pane = ActivePane::Movies;
    }

    /// Applies the selected genres as a discover listing.
    pub fn apply_genre_filter(&mut self) -> bool {
        let genre_ids = self.genre_panel.selected.clone();
        self.switch_view(ListingView::discover(genre_ids))
    }

    /// Enters an input mode with an empty buffer.
    pub fn start_input(&mut self, mode: InputMode) {
        self.input_mode = mode;
        self.input.clear();
    }

    /// Appends a character to the input buffer.
    ///
    /// Goto mode only accepts digits.
    pub fn input_push(&mut self, ch: char) {
        if self.input_mode == InputMode::Goto && !ch.is_ascii_digit() {
            return;
        }
        self.input.push(ch);
    }

    /// Removes the last character from the input buffer.
    pub fn input_pop(&mut self) {
        self.input.pop();
    }

    /// Leaves input mode without applying anything.
    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input.clear();
    }

    /// Applies the input buffer. Returns `true` if a fetch is needed.
    pub fn submit_input(&mut self) -> bool {
        let mode = self.input_mode;
        let text = std::mem::take(&mut self.input);
        self.input_mode = InputMode::Normal;

        match mode {
            InputMode::Search => {
                let query = text.trim();
                if query.is_empty() {
                    return false;
                }
                self.switch_view(ListingView::search(query))
            }
            InputMode::Goto => text
                .parse::<u32>()
                .is_ok_and(|page| self.change_page(PageAction::Goto(page))),
            InputMode::Normal => false,
        }
    }

    /// Toggles light/dark theme.
    pub const fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }
}
