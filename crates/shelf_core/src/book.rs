use serde::{Deserialize, Serialize};

/// Id carried by a book that has not been created on the server yet.
pub const DRAFT_BOOK_ID: i64 = -1;

/// A book as the server sends it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookResponse {
    pub id: i64,
    pub name: String,
    pub image: Option<String>,
    pub price: Option<i64>,
    pub purchase_date: Option<String>,
}

/// Editable, client-local book. Every field is kept as entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: i64,
    pub name: String,
    /// URL of the stored image, or a base64 payload once replaced locally.
    pub image: Option<String>,
    pub price: Option<String>,
    pub purchase_date: Option<String>,
}

impl Book {
    pub fn draft() -> Self {
        Self {
            id: DRAFT_BOOK_ID,
            name: String::new(),
            image: Some(String::new()),
            price: Some(String::new()),
            purchase_date: Some(String::new()),
        }
    }

    pub fn is_draft(&self) -> bool {
        self.id == DRAFT_BOOK_ID
    }

    /// Request body for add/edit. The id is never part of it.
    pub fn payload(&self) -> BookPayload {
        BookPayload {
            name: self.name.clone(),
            image: self.image.clone(),
            price: self.price.as_deref().and_then(|p| p.parse().ok()),
            purchase_date: self.purchase_date.clone(),
        }
    }
}

impl From<&BookResponse> for Book {
    fn from(response: &BookResponse) -> Self {
        Self {
            id: response.id,
            name: response.name.clone(),
            image: response.image.clone(),
            price: response.price.map(|p| p.to_string()),
            purchase_date: response.purchase_date.clone(),
        }
    }
}

/// Body of `POST /books` and `PUT /books/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookPayload {
    pub name: String,
    pub image: Option<String>,
    pub price: Option<i64>,
    pub purchase_date: Option<String>,
}
