//! TUI rendering logic for the movie browser.

use moviez_api::tmdb::{CARD_POSTER_SIZE, Movie, poster_url};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};

use super::state::{ActivePane, BrowserState, InputMode, LoadState, Theme};

/// Height of one movie card, borders included.
const CARD_HEIGHT: u16 = 5;

/// Width of the genre panel.
const GENRE_PANEL_WIDTH: u16 = 28;

/// Number of card columns for a grid of the given width.
#[must_use]
pub const fn grid_columns(width: u16) -> usize {
    match width {
        0..60 => 2,
        60..90 => 3,
        90..120 => 4,
        _ => 5,
    }
}

/// Foreground, background and accent colors for a theme.
const fn palette(theme: Theme) -> (Color, Color, Color) {
    match theme {
        Theme::Dark => (Color::White, Color::Black, Color::Cyan),
        Theme::Light => (Color::Black, Color::White, Color::Blue),
    }
}

/// Draws the browser UI. Returns the movie grid width for column calculation.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, state: &BrowserState) -> u16 {
    let (fg, bg, _) = palette(state.theme);
    frame.render_widget(
        Block::default().style(Style::default().fg(fg).bg(bg)),
        frame.area(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(CARD_HEIGHT),
            Constraint::Length(4), // selected movie
            Constraint::Length(3), // pagination
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], state);

    let grid_area = if state.active_pane == ActivePane::Genres {
        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(GENRE_PANEL_WIDTH), Constraint::Min(10)])
            .split(chunks[1]);
        draw_genre_panel(frame, panes[0], state);
        panes[1]
    } else {
        chunks[1]
    };
    draw_content(frame, grid_area, state);

    draw_detail(frame, chunks[2], state);
    draw_pagination(frame, chunks[3], state);
    draw_footer(frame, chunks[4], state);

    grid_area.width
}

/// Draws the header with the listing title and page position.
#[allow(clippy::indexing_slicing)]
fn draw_header(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let (_, _, accent) = palette(state.theme);
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let title = Paragraph::new(Span::styled(
        state.view.title.clone(),
        Style::default().fg(accent).add_modifier(Modifier::BOLD),
    ))
    .block(Block::default().borders(Borders::ALL).title(" MovieZ "));
    frame.render_widget(title, header_chunks[0]);

    let position = Paragraph::new(format!(
        "Page {} of {}",
        state.page.current_page, state.page.total_pages
    ))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(position, header_chunks[1]);
}

/// Draws the card grid, or a status message in its place.
fn draw_content(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let message = match &state.load {
        LoadState::Idle => Some(Line::from("")),
        LoadState::Loading => Some(Line::from("Loading...")),
        LoadState::Failed(msg) => Some(Line::from(Span::styled(
            format!("Error: {msg}"),
            Style::default().fg(Color::Red),
        ))),
        LoadState::Loaded if state.movies.is_empty() => {
            Some(Line::from(state.view.empty_text.clone()))
        }
        LoadState::Loaded => None,
    };

    if let Some(line) = message {
        let widget = Paragraph::new(line)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(widget, area);
        return;
    }

    draw_grid(frame, area, state);
}

/// Draws the visible rows of movie cards, scrolled to keep the selection visible.
#[allow(clippy::arithmetic_side_effects)]
fn draw_grid(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let columns = state.columns.max(1);
    let visible_rows = usize::from((area.height / CARD_HEIGHT).max(1));
    let selected_row = state.selected / columns;
    let first_row = selected_row.saturating_sub(visible_rows.saturating_sub(1));
    let ratio = u32::try_from(columns).unwrap_or(1);

    let row_rects = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(CARD_HEIGHT); visible_rows])
        .split(area);

    for (offset, row_area) in row_rects.iter().enumerate() {
        let start = first_row.saturating_add(offset).saturating_mul(columns);
        let Some(row_movies) = state.movies.get(start..) else {
            break;
        };
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, ratio); columns])
            .split(*row_area);

        for (i, (movie, cell)) in row_movies.iter().zip(cells.iter()).enumerate() {
            let selected = start.saturating_add(i) == state.selected;
            draw_card(frame, *cell, movie, selected, state.theme);
        }
    }
}

/// Draws a single movie card.
fn draw_card(frame: &mut Frame, area: Rect, movie: &Movie, selected: bool, theme: Theme) {
    let (_, _, accent) = palette(theme);
    let border_style = if selected {
        Style::default().fg(accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let year = movie
        .release_year()
        .map_or_else(|| String::from("----"), |y| y.to_string());
    let lines = vec![
        Line::from(Span::styled(
            format!("★ {}/10", movie.rating_label()),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(Span::styled(
            movie.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(year),
    ];

    let card = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(card, area);
}

/// Draws the genre filter panel (left).
fn draw_genre_panel(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let (_, _, accent) = palette(state.theme);
    let panel = &state.genre_panel;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
        .title(" Genres ");

    if let Some(err) = &panel.error {
        let widget = Paragraph::new(format!("Error: {err}"))
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(widget, area);
        return;
    }

    let items: Vec<ListItem> = panel
        .genres
        .iter()
        .enumerate()
        .map(|(i, genre)| {
            let mark = if panel.is_selected(genre.id) { "[x]" } else { "[ ]" };
            let style = if i == panel.cursor {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            ListItem::new(format!("{mark} {}", genre.name)).style(style)
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

/// Draws details of the selected movie.
fn draw_detail(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let lines = state.selected_movie().map_or_else(Vec::new, |movie| {
        let poster = poster_url(
            &state.image_base_url,
            CARD_POSTER_SIZE,
            movie.poster_path.as_deref(),
        )
        .unwrap_or_else(|| String::from("(no poster)"));
        vec![
            Line::from(movie.overview.clone().unwrap_or_default()),
            Line::from(Span::styled(poster, Style::default().fg(Color::DarkGray))),
        ]
    });

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(widget, area);
}

/// Builds the spans of the pagination bar.
pub(crate) fn pagination_spans(state: &BrowserState, accent: Color) -> Vec<Span<'static>> {
    let page = &state.page;
    let mut spans = Vec::new();

    if page.has_previous() {
        spans.push(Span::raw("‹ Prev  "));
    }

    for indicator in page.window() {
        let span = match indicator.page() {
            Some(n) if page.is_active(n) => Span::styled(
                format!("[{n}]"),
                Style::default()
                    .fg(accent)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED),
            ),
            Some(n) => Span::raw(format!(" {n} ")),
            None => Span::raw(" ... "),
        };
        spans.push(span);
    }

    let next_style = if page.has_next() {
        Style::default()
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };
    spans.push(Span::styled("  Next ›", next_style));
    spans
}

/// Draws the pagination bar.
fn draw_pagination(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let (_, _, accent) = palette(state.theme);
    let title = format!(" Total Movies: {} ", state.total_results);
    let widget = Paragraph::new(Line::from(pagination_spans(state, accent)))
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(widget, area);
}

/// Draws the footer with key hints or the active input prompt.
fn draw_footer(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let (text, style) = match state.input_mode {
        InputMode::Search => (
            format!("Search: {}_", state.input),
            Style::default().fg(Color::Yellow),
        ),
        InputMode::Goto => (
            format!("Go to page: {}_", state.input),
            Style::default().fg(Color::Yellow),
        ),
        InputMode::Normal if state.active_pane == ActivePane::Genres => (
            String::from("↑↓: Move  Space: Toggle  Enter: Apply  Esc: Back  q: Quit"),
            Style::default(),
        ),
        InputMode::Normal => (
            String::from(
                "←↑↓→: Move  n/p: Page  g: Go to  r: Reload  /: Search  1-3: Lists  s: Similar  G: Genres  o: Open  t: Theme  q: Quit",
            ),
            Style::default(),
        ),
    };

    let footer = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
