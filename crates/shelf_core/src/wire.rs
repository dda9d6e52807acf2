//! Request and response bodies exchanged with the book service.
//!
//! Field names on the wire are snake_case, which is also the Rust field
//! style, so no renaming is applied in either direction.

use serde::{Deserialize, Serialize};

use crate::book::BookResponse;

/// Body of `POST /login` and `POST /sign_up`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    pub status: i64,
    pub result: User,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogoutResponse {
    pub status: i64,
}

/// One page of `GET /books`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BookListResponse {
    pub status: i64,
    pub result: Vec<BookResponse>,
    pub total_count: u32,
    pub total_pages: u32,
    pub current_page: u32,
    pub limit: u32,
}

/// Response of `POST /books` and `PUT /books/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BookEnvelope {
    pub status: i64,
    pub result: BookResponse,
}
