use crate::book::{BookPayload, BookResponse};
use crate::wire::{BookListResponse, Credentials, User};

/// Work a screen asks its host to perform after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Request(ApiRequest),
    /// Persist the session token under the credential key.
    StoreToken(String),
    ClearToken,
    /// Drop every result still in flight for this screen.
    DiscardPending,
}

/// One call against the book service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
    Login(Credentials),
    SignUp(Credentials),
    Logout,
    ListBooks { page: u32, limit: u32 },
    AddBook(BookPayload),
    EditBook { id: i64, payload: BookPayload },
}

impl ApiRequest {
    /// Whether the call carries the stored access token.
    pub fn requires_auth(&self) -> bool {
        !matches!(self, ApiRequest::Login(_) | ApiRequest::SignUp(_))
    }
}

/// Decoded result of an [`ApiRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiOutcome {
    Authenticated(User),
    LoggedOut,
    BookPage(BookListResponse),
    BookSaved(BookResponse),
}
