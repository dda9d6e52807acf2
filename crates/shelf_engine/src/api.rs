//! The book service's endpoints and the dispatcher that runs an
//! [`ApiRequest`] against them.

use shelf_core::wire::{AuthResponse, BookEnvelope, BookListResponse, Credentials, LogoutResponse};
use shelf_core::{ApiOutcome, ApiRequest, BookPayload, ScreenError};

use crate::request::{HttpMethod, PageQuery, RequestDescriptor};
use crate::transport::ApiClient;

/// Header carrying the session token on authenticated calls.
pub const ACCESS_TOKEN_HEADER: &str = "access_token";

pub fn login(credentials: Credentials) -> RequestDescriptor<Credentials, AuthResponse> {
    RequestDescriptor::new(HttpMethod::Post, "/login").with_params(credentials)
}

pub fn sign_up(credentials: Credentials) -> RequestDescriptor<Credentials, AuthResponse> {
    RequestDescriptor::new(HttpMethod::Post, "/sign_up").with_params(credentials)
}

pub fn logout(token: &str) -> RequestDescriptor<(), LogoutResponse> {
    RequestDescriptor::new(HttpMethod::Delete, "/logout").with_header(ACCESS_TOKEN_HEADER, token)
}

pub fn list_books(token: &str, page: u32, limit: u32) -> RequestDescriptor<PageQuery, BookListResponse> {
    RequestDescriptor::new(HttpMethod::Get, "/books")
        .with_header(ACCESS_TOKEN_HEADER, token)
        .with_params(PageQuery::new(page, limit))
}

pub fn add_book(token: &str, payload: BookPayload) -> RequestDescriptor<BookPayload, BookEnvelope> {
    RequestDescriptor::new(HttpMethod::Post, "/books")
        .with_header(ACCESS_TOKEN_HEADER, token)
        .with_params(payload)
}

pub fn edit_book(
    token: &str,
    id: i64,
    payload: BookPayload,
) -> RequestDescriptor<BookPayload, BookEnvelope> {
    RequestDescriptor::new(HttpMethod::Put, format!("/books/{id}"))
        .with_header(ACCESS_TOKEN_HEADER, token)
        .with_params(payload)
}

fn require(token: Option<&str>) -> Result<&str, ScreenError> {
    token.ok_or(ScreenError::MissingCredential)
}

/// Runs one request. `token` is only consulted for calls that need it.
pub async fn execute(
    client: &ApiClient,
    request: ApiRequest,
    token: Option<&str>,
) -> Result<ApiOutcome, ScreenError> {
    let outcome = match request {
        ApiRequest::Login(credentials) => {
            ApiOutcome::Authenticated(client.send(&login(credentials)).await?.result)
        }
        ApiRequest::SignUp(credentials) => {
            ApiOutcome::Authenticated(client.send(&sign_up(credentials)).await?.result)
        }
        ApiRequest::Logout => {
            client.send(&logout(require(token)?)).await?;
            ApiOutcome::LoggedOut
        }
        ApiRequest::ListBooks { page, limit } => {
            ApiOutcome::BookPage(client.send(&list_books(require(token)?, page, limit)).await?)
        }
        ApiRequest::AddBook(payload) => {
            ApiOutcome::BookSaved(client.send(&add_book(require(token)?, payload)).await?.result)
        }
        ApiRequest::EditBook { id, payload } => ApiOutcome::BookSaved(
            client
                .send(&edit_book(require(token)?, id, payload))
                .await?
                .result,
        ),
    };
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authenticated_endpoints_carry_the_token_header() {
        let descriptor = list_books("tok", 1, 20);
        assert_eq!(
            descriptor.headers(),
            &[(ACCESS_TOKEN_HEADER.to_string(), "tok".to_string())]
        );
        assert_eq!(descriptor.method(), HttpMethod::Get);
        assert_eq!(descriptor.params(), Some(&PageQuery::new(1, 20)));
    }

    #[test]
    fn edit_path_embeds_the_book_id() {
        let payload = BookPayload {
            name: "Dune".to_string(),
            image: None,
            price: None,
            purchase_date: None,
        };
        let descriptor = edit_book("tok", 42, payload);
        assert_eq!(descriptor.path(), "/books/42");
        assert_eq!(descriptor.method(), HttpMethod::Put);
    }

    #[test]
    fn logout_has_no_params() {
        let descriptor = logout("tok");
        assert!(descriptor.params().is_none());
        assert_eq!(descriptor.method(), HttpMethod::Delete);
    }
}
