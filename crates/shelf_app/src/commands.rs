use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use shelf_core::{
    BookFormMsg, BookFormState, BookListMsg, BookListState, BookResponse, LoginMsg, LoginState,
    NetworkState, Screen, SettingsMsg, SettingsState, SignUpMsg, SignUpState,
};
use shelf_engine::{
    ApiClient, Engine, FileStore, ImageLoader, ReqwestImageLoader, ScreenController, SecureStore,
};
use shelf_logging::shelf_info;

use crate::config::AppConfig;

const REQUEST_WAIT: Duration = Duration::from_secs(60);

/// Book fields as typed on the command line. A field left out keeps its
/// current value when editing and starts empty when adding.
#[derive(Debug, Clone, Default)]
pub struct BookInput {
    pub name: Option<String>,
    pub price: Option<String>,
    pub purchase_date: Option<String>,
    pub image_url: Option<String>,
}

pub struct Session {
    engine: Engine,
    images: Arc<dyn ImageLoader>,
    store: Arc<dyn SecureStore>,
    page_limit: u32,
}

impl Session {
    pub fn start(config: &AppConfig) -> Result<Self> {
        let client = ApiClient::with_reqwest(config.client.clone()).map_err(|err| anyhow!(err))?;
        Self::new(
            client,
            Arc::new(ReqwestImageLoader::default()),
            Arc::new(FileStore::new(config.credentials_path.clone())),
            config.page_limit,
        )
    }

    pub fn new(
        client: ApiClient,
        images: Arc<dyn ImageLoader>,
        store: Arc<dyn SecureStore>,
        page_limit: u32,
    ) -> Result<Self> {
        let engine = Engine::new(client).context("failed to start request engine")?;
        Ok(Self {
            engine,
            images,
            store,
            page_limit,
        })
    }

    fn controller<S: Screen>(&self, initial: S) -> ScreenController<S> {
        ScreenController::new(initial, self.engine.clone(), self.store.clone())
    }

    pub fn login(&self, email: String, password: String) -> Result<()> {
        let mut controller = self.controller(LoginState::new());
        controller.dispatch(LoginMsg::EmailChanged(email));
        controller.dispatch(LoginMsg::PasswordChanged(password));
        controller.dispatch(LoginMsg::Submit);
        let state = finish(&mut controller, |s: &LoginState| s.validation_message.clone())?;
        println!("Signed in as {}.", state.email);
        Ok(())
    }

    pub fn sign_up(&self, email: String, password: String, confirm_password: String) -> Result<()> {
        let mut controller = self.controller(SignUpState::new());
        controller.dispatch(SignUpMsg::EmailChanged(email));
        controller.dispatch(SignUpMsg::PasswordChanged(password));
        controller.dispatch(SignUpMsg::ConfirmPasswordChanged(confirm_password));
        controller.dispatch(SignUpMsg::Submit);
        let state = finish(&mut controller, |s: &SignUpState| s.validation_message.clone())?;
        println!("Account created for {}.", state.email);
        Ok(())
    }

    pub fn logout(&self) -> Result<()> {
        let mut controller = self.controller(SettingsState::default());
        controller.dispatch(SettingsMsg::LogoutClicked);
        finish(&mut controller, |_: &SettingsState| None)?;
        println!("Signed out.");
        Ok(())
    }

    /// Fetches up to `pages` pages, printing each page as it arrives.
    pub fn list(&self, pages: u32) -> Result<()> {
        let mut controller = self.controller(BookListState::new(self.page_limit));
        let mut printed = 0;
        for _ in 0..pages {
            let before = controller.with_state(|s| s.pagination.current_page);
            controller.dispatch(BookListMsg::FetchNextPage);
            let state = finish(&mut controller, |_: &BookListState| None)?;
            if state.pagination.current_page == before {
                break;
            }
            for book in &state.items()[printed..] {
                print_book(book);
            }
            printed = state.items().len();
        }

        let pagination = controller.with_state(|s| s.pagination.clone());
        println!(
            "{} books, page {} of {}.",
            pagination.items.len(),
            pagination.current_page,
            pagination.total_pages
        );
        Ok(())
    }

    pub fn add(&self, input: BookInput) -> Result<()> {
        self.save_book(BookFormState::add(), input)
    }

    pub fn edit(&self, id: i64, input: BookInput) -> Result<()> {
        let existing = self.find_book(id)?;
        self.save_book(BookFormState::edit(&existing), input)
    }

    /// Pages through the list until the book turns up or the pages run out.
    fn find_book(&self, id: i64) -> Result<BookResponse> {
        let mut controller = self.controller(BookListState::new(self.page_limit));
        loop {
            let found = controller.with_state(|s| s.items().iter().find(|b| b.id == id).cloned());
            if let Some(book) = found {
                return Ok(book);
            }
            let before = controller.with_state(|s| s.pagination.current_page);
            controller.dispatch(BookListMsg::FetchNextPage);
            let state = finish(&mut controller, |_: &BookListState| None)?;
            if state.pagination.current_page == before {
                bail!("book {id} not found");
            }
        }
    }

    fn save_book(&self, initial: BookFormState, input: BookInput) -> Result<()> {
        let mut controller = self.controller(initial);
        if let Some(url) = input.image_url {
            shelf_info!("loading cover image from {url}");
            let before = controller.with_state(|s| s.book.image.clone());
            if !controller.load_image(self.images.clone(), url.clone()) {
                bail!("request engine is not running");
            }
            if !controller.wait_for_event(REQUEST_WAIT) {
                bail!("timed out loading the cover image");
            }
            // A failed load is delivered too, it just leaves the form alone.
            if controller.with_state(|s| s.book.image == before) {
                bail!("failed to load the cover image from {url}");
            }
        }

        if let Some(name) = input.name {
            controller.dispatch(BookFormMsg::NameChanged(name));
        }
        if let Some(price) = input.price {
            controller.dispatch(BookFormMsg::PriceChanged(price));
        }
        if let Some(date) = input.purchase_date {
            controller.dispatch(BookFormMsg::PurchaseDateChanged(date));
        }
        controller.dispatch(BookFormMsg::Submit);
        let state = finish(&mut controller, |s: &BookFormState| s.validation_message.clone())?;

        match state.saved {
            Some(book) => print_book(&book),
            None => println!("Saved."),
        }
        Ok(())
    }
}

/// Waits for the screen's request and turns validation or network failures
/// into errors.
fn finish<S: Screen>(
    controller: &mut ScreenController<S>,
    validation_message: impl Fn(&S) -> Option<String>,
) -> Result<S> {
    if !controller.settle(REQUEST_WAIT) {
        bail!("timed out waiting for the book service");
    }
    let state = controller.state();
    if let Some(message) = validation_message(&state) {
        bail!("{message}");
    }
    if let NetworkState::Error(err) = state.network() {
        return Err(anyhow!(*err)).context("request failed");
    }
    Ok(state)
}

fn print_book(book: &BookResponse) {
    let price = book
        .price
        .map(|price| price.to_string())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "#{:<6} {:<40} {:>8}  {}",
        book.id,
        book.name,
        price,
        book.purchase_date.as_deref().unwrap_or("-")
    );
}

#[cfg(test)]
mod tests {
    use std::sync::{Mutex, Once};

    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use shelf_core::ApiError;
    use shelf_engine::{
        encode_base64, ClientSettings, HttpMethod, MemoryStore, Transport, WireRequest, TOKEN_KEY,
    };

    use super::*;

    fn init_logging() {
        static INIT: Once = Once::new();
        INIT.call_once(shelf_logging::initialize_for_tests);
    }

    /// Two pages of the shelf; book 7 on the second page has a cover.
    #[derive(Default)]
    struct Shelf {
        requests: Mutex<Vec<WireRequest>>,
    }

    impl Shelf {
        fn requests(&self) -> Vec<WireRequest> {
            self.requests.lock().unwrap().clone()
        }

        fn saved_bodies(&self) -> Vec<Value> {
            self.requests()
                .into_iter()
                .filter(|r| matches!(r.method, HttpMethod::Post | HttpMethod::Put))
                .map(|r| serde_json::from_slice(&r.body.unwrap()).unwrap())
                .collect()
        }
    }

    fn book(id: i64, image: Option<&str>) -> Value {
        json!({
            "id": id,
            "name": format!("Book {id}"),
            "image": image,
            "price": 1500,
            "purchase_date": "2021-03-04"
        })
    }

    #[async_trait::async_trait]
    impl Transport for Shelf {
        async fn execute(&self, request: WireRequest) -> Result<Vec<u8>, ApiError> {
            self.requests.lock().unwrap().push(request.clone());
            let body = match (request.method, request.url.path()) {
                (HttpMethod::Get, "/books") => {
                    let page: u32 = request
                        .url
                        .query_pairs()
                        .find(|(key, _)| key == "page")
                        .and_then(|(_, value)| value.parse().ok())
                        .unwrap_or(1);
                    let result = match page {
                        1 => vec![book(1, None), book(2, None)],
                        _ => vec![book(7, Some("Y292ZXI="))],
                    };
                    json!({
                        "status": 200,
                        "result": result,
                        "total_count": 3,
                        "total_pages": 2,
                        "current_page": page,
                        "limit": 2
                    })
                }
                (HttpMethod::Put | HttpMethod::Post, path) if path.starts_with("/books") => {
                    let body = request.body.as_deref().unwrap_or(&b"{}"[..]);
                    let mut result: Value =
                        serde_json::from_slice(body).map_err(|_| ApiError::JsonDecode)?;
                    let id = path.trim_start_matches("/books/").parse::<i64>().unwrap_or(50);
                    result["id"] = json!(id);
                    json!({ "status": 200, "result": result })
                }
                _ => return Err(ApiError::UrlRequest),
            };
            Ok(body.to_string().into_bytes())
        }
    }

    struct FixedImage(Result<Vec<u8>, ApiError>);

    #[async_trait::async_trait]
    impl ImageLoader for FixedImage {
        async fn load(&self, _url: &str) -> Result<Vec<u8>, ApiError> {
            self.0.clone()
        }
    }

    fn session(shelf: Arc<Shelf>, image: Result<Vec<u8>, ApiError>) -> Session {
        init_logging();
        Session::new(
            ApiClient::new(ClientSettings::default(), shelf),
            Arc::new(FixedImage(image)),
            Arc::new(MemoryStore::with_entry(TOKEN_KEY, "tok-123")),
            2,
        )
        .unwrap()
    }

    #[test]
    fn edit_keeps_stored_fields_the_user_left_out() {
        let shelf = Arc::new(Shelf::default());
        let session = session(shelf.clone(), Err(ApiError::UrlRequest));

        session
            .edit(
                7,
                BookInput {
                    price: Some("1600".to_string()),
                    ..BookInput::default()
                },
            )
            .unwrap();

        let paths: Vec<_> = shelf
            .requests()
            .iter()
            .map(|r| (r.method, r.url.path().to_string()))
            .collect();
        assert_eq!(
            paths,
            vec![
                (HttpMethod::Get, "/books".to_string()),
                (HttpMethod::Get, "/books".to_string()),
                (HttpMethod::Put, "/books/7".to_string()),
            ]
        );
        assert_eq!(
            shelf.saved_bodies(),
            vec![json!({
                "name": "Book 7",
                "image": "Y292ZXI=",
                "price": 1600,
                "purchase_date": "2021-03-04"
            })]
        );
    }

    #[test]
    fn edit_of_unknown_book_sends_nothing() {
        let shelf = Arc::new(Shelf::default());
        let session = session(shelf.clone(), Err(ApiError::UrlRequest));

        let err = session.edit(99, BookInput::default()).unwrap_err();
        assert_eq!(err.to_string(), "book 99 not found");
        assert!(shelf.saved_bodies().is_empty());
    }

    #[test]
    fn failed_cover_download_aborts_the_save() {
        let shelf = Arc::new(Shelf::default());
        let session = session(shelf.clone(), Err(ApiError::UrlRequest));

        let err = session
            .add(BookInput {
                name: Some("Dune".to_string()),
                price: Some("1200".to_string()),
                purchase_date: Some("2020-06-23".to_string()),
                image_url: Some("https://covers.example.com/dune.png".to_string()),
                ..BookInput::default()
            })
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to load the cover image from https://covers.example.com/dune.png"
        );
        assert!(shelf.requests().is_empty());
    }

    #[test]
    fn downloaded_cover_is_sent_with_the_new_book() {
        let shelf = Arc::new(Shelf::default());
        let session = session(shelf.clone(), Ok(b"cover".to_vec()));

        session
            .add(BookInput {
                name: Some("Dune".to_string()),
                price: Some("1200".to_string()),
                purchase_date: Some("2020-06-23".to_string()),
                image_url: Some("https://covers.example.com/dune.png".to_string()),
                ..BookInput::default()
            })
            .unwrap();

        let bodies = shelf.saved_bodies();
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0]["name"], "Dune");
        assert_eq!(bodies[0]["image"], json!(encode_base64(b"cover")));
    }
}
