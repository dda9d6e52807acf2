use std::sync::Once;

use pretty_assertions::assert_eq;
use shelf_core::wire::BookListResponse;
use shelf_core::{
    update_book_list, ApiError, ApiOutcome, ApiRequest, BookListMsg, BookListState, BookResponse,
    Effect, NetworkState, ScreenError,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(shelf_logging::initialize_for_tests);
}

fn books(first_id: i64, count: usize) -> Vec<BookResponse> {
    (0..count as i64)
        .map(|offset| BookResponse {
            id: first_id + offset,
            name: format!("Book {}", first_id + offset),
            image: None,
            price: Some(1000),
            purchase_date: Some("2020-06-01".to_string()),
        })
        .collect()
}

fn page(current_page: u32, total_pages: u32, result: Vec<BookResponse>) -> ApiOutcome {
    ApiOutcome::BookPage(BookListResponse {
        status: 200,
        total_count: total_pages.saturating_mul(20),
        total_pages,
        current_page,
        limit: 20,
        result,
    })
}

fn list_request(page: u32) -> Effect {
    Effect::Request(ApiRequest::ListBooks { page, limit: 20 })
}

fn fetch(state: BookListState) -> (BookListState, Vec<Effect>) {
    update_book_list(state, BookListMsg::FetchNextPage)
}

fn complete(state: BookListState, outcome: ApiOutcome) -> BookListState {
    let (state, effects) = update_book_list(state, BookListMsg::Completed(Ok(outcome)));
    assert!(effects.is_empty());
    state
}

#[test]
fn first_fetch_passes_the_boundary_sentinel() {
    init_logging();
    let state = BookListState::new(20);
    assert_eq!(state.pagination.total_pages, 1);
    assert_eq!(state.pagination.current_page, 0);

    let (state, effects) = fetch(state);
    assert_eq!(effects, vec![list_request(1)]);
    assert_eq!(state.network, NetworkState::Loading);
}

#[test]
fn three_page_listing_accumulates_then_stops() {
    init_logging();
    let (state, _) = fetch(BookListState::new(20));
    let state = complete(state, page(1, 3, books(1, 20)));
    assert_eq!(state.items().len(), 20);
    assert_eq!(state.pagination.current_page, 1);
    assert_eq!(state.network, NetworkState::Finished);

    let (state, effects) = fetch(state);
    assert_eq!(effects, vec![list_request(2)]);
    let state = complete(state, page(2, 3, books(21, 20)));
    assert_eq!(state.items().len(), 40);

    let (state, effects) = fetch(state);
    assert_eq!(effects, vec![list_request(3)]);
    let state = complete(state, page(3, 3, books(41, 20)));
    assert_eq!(state.items().len(), 60);
    assert_eq!(state.pagination.current_page, 3);

    let before = state.clone();
    let (state, effects) = fetch(state);
    assert!(effects.is_empty());
    assert_eq!(state, before);
}

#[test]
fn fetch_while_loading_is_a_noop() {
    init_logging();
    let (state, _) = fetch(BookListState::new(20));
    let before = state.clone();

    let (state, effects) = fetch(state);
    assert!(effects.is_empty());
    assert_eq!(state, before);
}

#[test]
fn reset_discards_pending_and_refetches_page_one() {
    init_logging();
    let (state, _) = fetch(BookListState::new(20));
    let state = complete(state, page(1, 3, books(1, 20)));
    let (state, _) = fetch(state);
    assert!(state.network.is_loading());

    let (state, effects) = update_book_list(state, BookListMsg::Reset);
    assert_eq!(effects, vec![Effect::DiscardPending, list_request(1)]);
    assert!(state.items().is_empty());
    assert_eq!(state.pagination.current_page, 0);
    assert_eq!(state.pagination.total_pages, 1);
    assert!(state.network.is_loading());

    let fresh = books(500, 20);
    let state = complete(state, page(1, 5, fresh.clone()));
    assert_eq!(state.items(), fresh.as_slice());
    assert_eq!(state.pagination.current_page, 1);
    assert_eq!(state.pagination.total_pages, 5);
}

#[test]
fn failed_fetch_keeps_items_and_allows_retry() {
    init_logging();
    let (state, _) = fetch(BookListState::new(20));
    let state = complete(state, page(1, 2, books(1, 20)));
    let (state, _) = fetch(state);

    let (state, effects) = update_book_list(
        state,
        BookListMsg::Completed(Err(ScreenError::Api(ApiError::UrlRequest))),
    );
    assert!(effects.is_empty());
    assert_eq!(
        state.network,
        NetworkState::Error(ScreenError::Api(ApiError::UrlRequest))
    );
    assert_eq!(state.items().len(), 20);
    assert_eq!(state.pagination.current_page, 1);

    let (_, effects) = fetch(state);
    assert_eq!(effects, vec![list_request(2)]);
}

#[test]
fn unexpected_outcome_is_a_decode_error() {
    init_logging();
    let (state, _) = fetch(BookListState::new(20));
    let (state, _) = update_book_list(state, BookListMsg::Completed(Ok(ApiOutcome::LoggedOut)));
    assert_eq!(
        state.network,
        NetworkState::Error(ScreenError::Api(ApiError::JsonDecode))
    );
}

#[test]
fn oversized_page_is_capped_to_reported_capacity() {
    init_logging();
    let (state, _) = fetch(BookListState::new(20));
    let state = complete(state, page(1, 1, books(1, 25)));
    assert_eq!(state.items().len(), 20);
}

#[test]
fn last_representable_page_is_the_end_of_the_list() {
    init_logging();
    let (state, _) = fetch(BookListState::new(20));
    let state = complete(state, page(u32::MAX, u32::MAX, books(1, 20)));
    assert_eq!(state.pagination.current_page, u32::MAX);
    assert_eq!(state.pagination.next_page(), None);

    let before = state.clone();
    let (state, effects) = fetch(state);
    assert!(effects.is_empty());
    assert_eq!(state, before);
}
