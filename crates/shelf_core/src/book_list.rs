//! Paginated book list.
//!
//! `FetchNextPage` is guarded twice before any request leaves the screen: no
//! fetch while one is loading, and no fetch past the last page the server
//! reported. Both cases are silent no-ops.

use crate::book::BookResponse;
use crate::screen::unexpected_outcome;
use crate::wire::BookListResponse;
use crate::{ApiOutcome, ApiRequest, Effect, NetworkState, Screen, ScreenError};

pub const DEFAULT_PAGE_LIMIT: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    pub current_page: u32,
    pub limit: u32,
    /// Starts at 1 so the very first fetch passes the boundary check.
    pub total_pages: u32,
    pub items: Vec<BookResponse>,
}

impl PaginationState {
    pub fn new(limit: u32) -> Self {
        Self {
            current_page: 0,
            limit: limit.max(1),
            total_pages: 1,
            items: Vec::new(),
        }
    }

    /// The page to request next, if the server reported one.
    pub fn next_page(&self) -> Option<u32> {
        let next = self.current_page.checked_add(1)?;
        (next <= self.total_pages).then_some(next)
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.limit);
    }

    pub fn record(&mut self, page: BookListResponse) {
        self.current_page = page.current_page;
        self.total_pages = page.total_pages.max(1);
        let capacity = (self.total_pages as usize).saturating_mul(self.limit as usize);
        let room = capacity.saturating_sub(self.items.len());
        self.items.extend(page.result.into_iter().take(room));
    }
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_LIMIT)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BookListState {
    pub network: NetworkState<ScreenError>,
    pub pagination: PaginationState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookListMsg {
    /// Scrolled near the end of the list, or first appearance.
    FetchNextPage,
    /// Pull-to-refresh: start over from page one.
    Reset,
    Completed(Result<ApiOutcome, ScreenError>),
}

impl BookListState {
    pub fn new(limit: u32) -> Self {
        Self {
            network: NetworkState::Standby,
            pagination: PaginationState::new(limit),
        }
    }

    pub fn items(&self) -> &[BookResponse] {
        &self.pagination.items
    }
}

pub fn update_book_list(mut state: BookListState, msg: BookListMsg) -> (BookListState, Vec<Effect>) {
    let effects = match msg {
        BookListMsg::FetchNextPage => fetch_next_page(&mut state),
        BookListMsg::Reset => {
            state.pagination.reset();
            state.network.reset();
            let mut effects = vec![Effect::DiscardPending];
            effects.extend(fetch_next_page(&mut state));
            effects
        }
        BookListMsg::Completed(result) => {
            let result = match result {
                Ok(ApiOutcome::BookPage(page)) => Ok(page),
                Ok(_) => Err(unexpected_outcome()),
                Err(err) => Err(err),
            };
            state.network.complete(&result);
            if let Ok(page) = result {
                state.pagination.record(page);
            }
            Vec::new()
        }
    };
    (state, effects)
}

fn fetch_next_page(state: &mut BookListState) -> Vec<Effect> {
    if state.network.is_loading() {
        return Vec::new();
    }
    let Some(page) = state.pagination.next_page() else {
        return Vec::new();
    };
    state.network.begin();
    vec![Effect::Request(ApiRequest::ListBooks {
        page,
        limit: state.pagination.limit,
    })]
}

impl Screen for BookListState {
    type Msg = BookListMsg;
    const ONE_SHOT: bool = false;

    fn update(self, msg: BookListMsg) -> (Self, Vec<Effect>) {
        update_book_list(self, msg)
    }

    fn completed(result: Result<ApiOutcome, ScreenError>) -> BookListMsg {
        BookListMsg::Completed(result)
    }

    fn network(&self) -> &NetworkState<ScreenError> {
        &self.network
    }
}
