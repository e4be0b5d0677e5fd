use serde::Serialize;

/// Default number of leads requested per page.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;

/// Maximum number of numbered page buttons rendered at once.
pub const PAGE_WINDOW: usize = 5;

/// Pagination of the lead list. `total` and `total_pages` are whatever the
/// server last reported.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct PaginationState {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl PaginationState {
    pub fn new(limit: usize) -> Self {
        Self {
            page: 1,
            limit: limit.max(1),
            total: 0,
            total_pages: 0,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(DEFAULT_ITEMS_PER_PAGE)
    }
}

/// Page numbers shown in the pagination control.
///
/// The window starts two pages before the current one (never before page 1),
/// holds at most [`PAGE_WINDOW`] entries and stops at the last page.
pub fn page_window(current_page: usize, total_pages: usize) -> Vec<usize> {
    if total_pages == 0 {
        return vec![];
    }

    let start = current_page.saturating_sub(2).max(1);
    let len = PAGE_WINDOW.min(total_pages);

    (start..start + len)
        .take_while(|page| *page <= total_pages)
        .collect()
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct PageLink {
    pub number: usize,
    pub href: String,
    pub current: bool,
}

/// Ready-to-render pagination control.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct PageNav {
    pub pages: Vec<PageLink>,
    pub previous: Option<String>,
    pub next: Option<String>,
    pub visible: bool,
}

impl PageNav {
    /// Builds the control, using `href` to turn a page number into a link.
    pub fn new(state: &PaginationState, href: impl Fn(usize) -> String) -> Self {
        let pages = page_window(state.page, state.total_pages)
            .into_iter()
            .map(|number| PageLink {
                number,
                href: href(number),
                current: number == state.page,
            })
            .collect();

        Self {
            pages,
            previous: state.has_previous().then(|| href(state.page - 1)),
            next: state.has_next().then(|| href(state.page + 1)),
            visible: state.total_pages > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_empty_without_pages() {
        assert!(page_window(1, 0).is_empty());
    }

    #[test]
    fn window_starts_at_first_page() {
        assert_eq!(page_window(1, 10), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(2, 10), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(3, 10), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn window_slides_with_current_page() {
        assert_eq!(page_window(6, 10), vec![4, 5, 6, 7, 8]);
    }

    #[test]
    fn window_is_clamped_at_last_page() {
        assert_eq!(page_window(10, 10), vec![8, 9, 10]);
        assert_eq!(page_window(2, 3), vec![1, 2, 3]);
    }

    #[test]
    fn nav_disables_edges() {
        let state = PaginationState {
            page: 1,
            limit: 20,
            total: 45,
            total_pages: 3,
        };

        let nav = PageNav::new(&state, |page| format!("?page={page}"));

        assert!(nav.visible);
        assert!(nav.previous.is_none());
        assert_eq!(nav.next.as_deref(), Some("?page=2"));
        assert_eq!(nav.pages.len(), 3);
        assert!(nav.pages[0].current);
    }

    #[test]
    fn nav_hidden_for_single_page() {
        let state = PaginationState {
            page: 1,
            limit: 20,
            total: 4,
            total_pages: 1,
        };

        let nav = PageNav::new(&state, |page| page.to_string());

        assert!(!nav.visible);
        assert!(nav.next.is_none());
    }
}
