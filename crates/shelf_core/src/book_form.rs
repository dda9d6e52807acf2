use crate::auth::submit;
use crate::book::{Book, BookResponse};
use crate::screen::unexpected_outcome;
use crate::validation::{CompositeValidator, FormValidation};
use crate::{ApiOutcome, ApiRequest, Effect, NetworkState, Screen, ScreenError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit { id: i64 },
}

/// Add or edit form for a single book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookFormState {
    pub mode: FormMode,
    pub book: Book,
    pub network: NetworkState<ScreenError>,
    pub validation_message: Option<String>,
    /// The server's copy after a successful submit.
    pub saved: Option<BookResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookFormMsg {
    NameChanged(String),
    PriceChanged(String),
    PurchaseDateChanged(String),
    /// A picked or downloaded image, already base64-encoded.
    ImageEncoded(String),
    Submit,
    Completed(Result<ApiOutcome, ScreenError>),
}

impl BookFormState {
    pub fn add() -> Self {
        Self::with_mode(FormMode::Add, Book::draft())
    }

    pub fn edit(book: &BookResponse) -> Self {
        Self::with_mode(FormMode::Edit { id: book.id }, Book::from(book))
    }

    fn with_mode(mode: FormMode, book: Book) -> Self {
        Self {
            mode,
            book,
            network: NetworkState::Standby,
            validation_message: None,
            saved: None,
        }
    }

    pub fn validation(&self) -> FormValidation {
        FormValidation::new()
            .field(CompositeValidator::book_name(), self.book.name.clone())
            .field(
                CompositeValidator::book_price(),
                self.book.price.clone().unwrap_or_default(),
            )
            .field(
                CompositeValidator::book_purchase_date(),
                self.book.purchase_date.clone().unwrap_or_default(),
            )
    }

    fn request(&self) -> ApiRequest {
        let payload = self.book.payload();
        match self.mode {
            FormMode::Add => ApiRequest::AddBook(payload),
            FormMode::Edit { id } => ApiRequest::EditBook { id, payload },
        }
    }
}

pub fn update_book_form(mut state: BookFormState, msg: BookFormMsg) -> (BookFormState, Vec<Effect>) {
    let effects = match msg {
        BookFormMsg::NameChanged(name) => {
            state.book.name = name;
            Vec::new()
        }
        BookFormMsg::PriceChanged(price) => {
            state.book.price = Some(price);
            Vec::new()
        }
        BookFormMsg::PurchaseDateChanged(date) => {
            state.book.purchase_date = Some(date);
            Vec::new()
        }
        BookFormMsg::ImageEncoded(base64) => {
            state.book.image = Some(base64);
            Vec::new()
        }
        BookFormMsg::Submit => {
            let validation = state.validation();
            let request = state.request();
            submit(
                &mut state.network,
                &mut state.validation_message,
                &validation,
                || request,
            )
        }
        BookFormMsg::Completed(result) => {
            let result = match result {
                Ok(ApiOutcome::BookSaved(book)) => Ok(book),
                Ok(_) => Err(unexpected_outcome()),
                Err(err) => Err(err),
            };
            state.network.complete(&result);
            state.saved = result.ok();
            Vec::new()
        }
    };
    (state, effects)
}

impl Screen for BookFormState {
    type Msg = BookFormMsg;
    const ONE_SHOT: bool = true;

    fn update(self, msg: BookFormMsg) -> (Self, Vec<Effect>) {
        update_book_form(self, msg)
    }

    fn completed(result: Result<ApiOutcome, ScreenError>) -> BookFormMsg {
        BookFormMsg::Completed(result)
    }

    fn image_encoded(base64: String) -> Option<BookFormMsg> {
        Some(BookFormMsg::ImageEncoded(base64))
    }

    fn network(&self) -> &NetworkState<ScreenError> {
        &self.network
    }
}
