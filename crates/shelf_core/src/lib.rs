//! Bookshelf core: validation, wire model and pure screen state machines.
//!
//! Nothing here performs I/O. Each screen is a state value plus an `update`
//! function returning the [`Effect`]s its host must run.
mod auth;
mod book;
mod book_form;
mod book_list;
mod effect;
mod error;
mod network;
pub mod observable;
mod screen;
mod settings;
pub mod validation;
pub mod wire;

pub use auth::{update_login, update_sign_up, LoginMsg, LoginState, SignUpMsg, SignUpState};
pub use book::{Book, BookPayload, BookResponse, DRAFT_BOOK_ID};
pub use book_form::{update_book_form, BookFormMsg, BookFormState, FormMode};
pub use book_list::{
    update_book_list, BookListMsg, BookListState, PaginationState, DEFAULT_PAGE_LIMIT,
};
pub use effect::{ApiOutcome, ApiRequest, Effect};
pub use error::{ApiError, ScreenError};
pub use network::NetworkState;
pub use observable::{Observable, Subscription};
pub use screen::Screen;
pub use settings::{update_settings, SettingsMsg, SettingsState};
pub use validation::{
    CompositeValidator, FormValidation, ValidationError, ValidationResult, Validator,
};
