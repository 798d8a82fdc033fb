//! Interactive movie browser.
//!
//! Uses `ratatui` + `crossterm` for rendering. Pages are fetched on
//! demand; a "Loading..." frame is drawn before each request.

/// Browser state types.
pub mod state;
mod ui;

use std::io;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use moviez_api::pagination::PageAction;
use moviez_api::tmdb::{ListParams, ListingView, MoviePage, TmdbApi, movie_page_url};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use self::state::{ActivePane, BrowserState, InputMode};

/// Settings for a browser session.
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// Listing shown on start.
    pub view: ListingView,
    /// Response language for all requests.
    pub language: String,
    /// Image service base URL for poster links.
    pub image_base_url: String,
}

/// What the event loop should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
enum KeyOutcome {
    /// Redraw only.
    None,
    /// Fetch the current page of the current listing.
    Fetch,
    /// Open a URL in the system browser.
    Open(String),
    /// Leave the browser.
    Quit,
}

impl From<bool> for KeyOutcome {
    fn from(fetch: bool) -> Self {
        if fetch { Self::Fetch } else { Self::None }
    }
}

/// Runs the movie browser TUI until the user quits.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
/// API failures are shown in the browser instead.
#[allow(clippy::module_name_repetitions)]
pub async fn run_browser<C: TmdbApi>(client: &C, options: BrowserOptions) -> Result<()> {
    let mut state = BrowserState::new(options.view, options.image_base_url);

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut state, client, &options.language).await;

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Main event loop.
async fn run_event_loop<C: TmdbApi>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut BrowserState,
    client: &C,
    language: &str,
) -> Result<()> {
    let mut grid_width: u16 = 0;

    state.begin_loading();
    terminal
        .draw(|frame| {
            grid_width = ui::draw(frame, state);
        })
        .context("failed to draw TUI")?;

    let genres = client
        .genre_list(language)
        .await
        .map(|list| list.genres)
        .map_err(|e| format!("{e:#}"));
    state.apply_genres(genres);

    let mut pending_fetch = true;

    loop {
        if pending_fetch {
            pending_fetch = false;
            state.begin_loading();
            terminal
                .draw(|frame| {
                    grid_width = ui::draw(frame, state);
                })
                .context("failed to draw TUI")?;
            let result = fetch_current_page(client, state, language).await;
            state.apply_page(result);
        }

        terminal
            .draw(|frame| {
                grid_width = ui::draw(frame, state);
            })
            .context("failed to draw TUI")?;
        state.set_columns(ui::grid_columns(grid_width));

        if event::poll(std::time::Duration::from_millis(100)).context("failed to poll events")?
            && let Event::Key(key) = event::read().context("failed to read event")?
            && key.kind == KeyEventKind::Press
        {
            match handle_key(state, key.code, key.modifiers) {
                KeyOutcome::Quit => return Ok(()),
                KeyOutcome::Fetch => pending_fetch = true,
                KeyOutcome::Open(url) => {
                    let _ = open::that(&url);
                }
                KeyOutcome::None => {}
            }
        }
    }
}

/// Fetches the page the state currently points at.
///
/// Errors are flattened to their display text for the error panel.
async fn fetch_current_page<C: TmdbApi>(
    client: &C,
    state: &BrowserState,
    language: &str,
) -> Result<MoviePage, String> {
    let params = ListParams::page(state.page.current_page).language(language);
    client
        .movie_list(&state.view.resource, &params)
        .await
        .map_err(|e| format!("{e:#}"))
}

/// Dispatches a key press by input mode and focused pane.
fn handle_key(state: &mut BrowserState, key: KeyCode, modifiers: KeyModifiers) -> KeyOutcome {
    if key == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return KeyOutcome::Quit;
    }
    match (state.input_mode, state.active_pane) {
        (InputMode::Search | InputMode::Goto, _) => handle_text_input(state, key),
        (InputMode::Normal, ActivePane::Genres) => handle_genre_input(state, key),
        (InputMode::Normal, ActivePane::Movies) => handle_normal_input(state, key),
    }
}

/// Handles key input while typing a query or page number.
fn handle_text_input(state: &mut BrowserState, key: KeyCode) -> KeyOutcome {
    match key {
        KeyCode::Esc => {
            state.cancel_input();
            KeyOutcome::None
        }
        KeyCode::Enter => state.submit_input().into(),
        KeyCode::Backspace => {
            state.input_pop();
            KeyOutcome::None
        }
        KeyCode::Char(c) => {
            state.input_push(c);
            KeyOutcome::None
        }
        _ => KeyOutcome::None,
    }
}

/// Handles key input in the genre panel.
fn handle_genre_input(state: &mut BrowserState, key: KeyCode) -> KeyOutcome {
    match key {
        KeyCode::Char('q') => return KeyOutcome::Quit,
        KeyCode::Up | KeyCode::Char('k') => state.move_up(),
        KeyCode::Down | KeyCode::Char('j') => state.move_down(),
        KeyCode::Char(' ') => state.genre_panel.toggle_current(),
        KeyCode::Enter => return state.apply_genre_filter().into(),
        KeyCode::Esc | KeyCode::Right | KeyCode::Char('G') => state.focus_movies(),
        _ => {}
    }
    KeyOutcome::None
}

/// Handles key input on the movie grid.
fn handle_normal_input(state: &mut BrowserState, key: KeyCode) -> KeyOutcome {
    match key {
        KeyCode::Char('q') => return KeyOutcome::Quit,
        KeyCode::Left | KeyCode::Char('h') => state.move_left(),
        KeyCode::Right | KeyCode::Char('l') => state.move_right(),
        KeyCode::Up | KeyCode::Char('k') => state.move_up(),
        KeyCode::Down | KeyCode::Char('j') => state.move_down(),
        KeyCode::Char('n') | KeyCode::PageDown => {
            return state.change_page(PageAction::Next).into();
        }
        KeyCode::Char('p') | KeyCode::PageUp => {
            return state.change_page(PageAction::Previous).into();
        }
        KeyCode::Char('r') => return KeyOutcome::Fetch,
        KeyCode::Char('g') => state.start_input(InputMode::Goto),
        KeyCode::Char('/') => state.start_input(InputMode::Search),
        KeyCode::Char('1') => return state.switch_view(ListingView::popular()).into(),
        KeyCode::Char('2') => return state.switch_view(ListingView::top_rated()).into(),
        KeyCode::Char('3') => return state.switch_view(ListingView::upcoming()).into(),
        KeyCode::Char('s') => return state.show_similar().into(),
        KeyCode::Char('G') => state.focus_genres(),
        KeyCode::Char('t') => state.toggle_theme(),
        KeyCode::Char('o') => {
            if let Some(movie) = state.selected_movie() {
                return KeyOutcome::Open(movie_page_url(movie.id));
            }
        }
        _ => {}
    }
    KeyOutcome::None
}
