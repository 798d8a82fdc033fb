//! Page window calculation for pagination controls.
//!
//! A pagination control shows the page before the current one, the current
//! page, the page after it, and an ellipsis when more pages follow further
//! ahead. There is never a direct link to the final page.

use std::fmt;

/// A single entry in a pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageIndicator {
    /// A clickable page number (1-based).
    Page(u32),
    /// "More pages exist beyond this point". Not navigable.
    Ellipsis,
}

impl PageIndicator {
    /// Returns the page number, or `None` for the ellipsis.
    #[must_use]
    pub const fn page(self) -> Option<u32> {
        match self {
            Self::Page(page) => Some(page),
            Self::Ellipsis => None,
        }
    }
}

impl fmt::Display for PageIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page(page) => write!(f, "{page}"),
            Self::Ellipsis => f.write_str("..."),
        }
    }
}

/// Computes the page window for `current_page` out of `total_pages`.
///
/// The window is built from four rules, applied in order:
///
/// 1. the previous page, if `current_page > 1`
/// 2. the current page
/// 3. the next page, if `current_page < total_pages`
/// 4. an ellipsis, if `current_page < total_pages - 2`
///
/// `current_page <= total_pages` is expected but not checked; inconsistent
/// input still produces a window without panicking.
///
/// # Examples
///
/// ```
/// use moviez_api::pagination::{PageIndicator, page_window};
///
/// assert_eq!(
///     page_window(3, 10),
///     vec![
///         PageIndicator::Page(2),
///         PageIndicator::Page(3),
///         PageIndicator::Page(4),
///         PageIndicator::Ellipsis,
///     ]
/// );
/// assert_eq!(page_window(5, 5), vec![PageIndicator::Page(4), PageIndicator::Page(5)]);
/// ```
#[must_use]
pub fn page_window(current_page: u32, total_pages: u32) -> Vec<PageIndicator> {
    let mut pages = Vec::with_capacity(4);

    if current_page > 1 {
        pages.push(PageIndicator::Page(current_page.saturating_sub(1)));
    }
    pages.push(PageIndicator::Page(current_page));
    if current_page < total_pages {
        pages.push(PageIndicator::Page(current_page.saturating_add(1)));
    }
    // Independent of rule 3: no last-page link follows the ellipsis.
    if current_page < total_pages.saturating_sub(2) {
        pages.push(PageIndicator::Ellipsis);
    }

    pages
}

/// Navigation requested through a pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    /// "Go to previous page".
    Previous,
    /// "Go to a specific page".
    Goto(u32),
    /// "Go to next page".
    Next,
}

/// Current position in a paged result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    /// Current page (1-based).
    pub current_page: u32,
    /// Total number of pages reported by the data provider.
    pub total_pages: u32,
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl PageState {
    /// Creates a page state.
    #[must_use]
    pub const fn new(current_page: u32, total_pages: u32) -> Self {
        Self {
            current_page,
            total_pages,
        }
    }

    /// Returns the page window for this state.
    #[must_use]
    pub fn window(&self) -> Vec<PageIndicator> {
        page_window(self.current_page, self.total_pages)
    }

    /// Whether the "previous page" affordance is shown.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    /// Whether a page exists after the current one.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Whether `page` is the highlighted (current) page.
    #[must_use]
    pub const fn is_active(&self, page: u32) -> bool {
        self.current_page == page
    }

    /// Resolves a navigation action into the page to hand to the page-change
    /// callback. Returns `None` when the action leads nowhere.
    #[must_use]
    pub const fn resolve(&self, action: PageAction) -> Option<u32> {
        match action {
            PageAction::Previous if self.has_previous() => Some(self.current_page.saturating_sub(1)),
            PageAction::Next if self.has_next() => Some(self.current_page.saturating_add(1)),
            PageAction::Goto(page) if page >= 1 && page <= self.total_pages => Some(page),
            PageAction::Previous | PageAction::Next | PageAction::Goto(_) => None,
        }
    }
}

/// Renders a window as a single line, with the active page in brackets.
///
/// `page_window(2, 10)` renders as `1 [2] 3 ...`.
#[must_use]
pub fn render_window(state: &PageState) -> String {
    state
        .window()
        .iter()
        .map(|indicator| match *indicator {
            PageIndicator::Page(page) if state.is_active(page) => format!("[{page}]"),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
