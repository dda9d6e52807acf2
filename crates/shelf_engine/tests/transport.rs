use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;
use shelf_core::wire::{BookListResponse, Credentials};
use shelf_core::{ApiError, ApiOutcome, ApiRequest, ScreenError};
use shelf_engine::api::{self, ACCESS_TOKEN_HEADER};
use shelf_engine::{
    encode_base64, ApiClient, ClientSettings, HttpMethod, ImageLoader, ReqwestImageLoader,
    ReqwestTransport, RequestDescriptor,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    let settings = ClientSettings {
        scheme: "http".to_string(),
        host: server.address().to_string(),
    };
    ApiClient::new(settings, Arc::new(ReqwestTransport::new().unwrap()))
}

fn page_body() -> serde_json::Value {
    json!({
        "status": 200,
        "result": [
            { "id": 1, "name": "Dune", "image": null, "price": 1200, "purchase_date": "2020-06-23" }
        ],
        "total_count": 41,
        "total_pages": 3,
        "current_page": 2,
        "limit": 20
    })
}

#[tokio::test]
async fn list_books_sends_query_and_token_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/books"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "20"))
        .and(header(ACCESS_TOKEN_HEADER, "tok-123"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body()))
        .expect(1)
        .mount(&server)
        .await;

    let page = client_for(&server)
        .send(&api::list_books("tok-123", 2, 20))
        .await
        .expect("page");
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.current_page, 2);
    assert_eq!(page.result[0].purchase_date.as_deref(), Some("2020-06-23"));
}

#[tokio::test]
async fn login_posts_snake_case_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({ "email": "reader@example.com", "password": "hunter22" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 200,
            "result": { "id": 9, "email": "reader@example.com", "token": "tok-9" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = api::execute(
        &client_for(&server),
        ApiRequest::Login(Credentials {
            email: "reader@example.com".to_string(),
            password: "hunter22".to_string(),
        }),
        None,
    )
    .await
    .expect("login");
    match outcome {
        ApiOutcome::Authenticated(user) => assert_eq!(user.token, "tok-9"),
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[tokio::test]
async fn non_success_status_is_a_request_error() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/logout"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "status": 401 })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .send(&api::logout("stale"))
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::UrlRequest);
}

#[tokio::test]
async fn unexpected_shape_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/books"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .send(&api::list_books("tok", 1, 20))
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::JsonDecode);
}

#[tokio::test]
async fn assembly_failure_never_reaches_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body()))
        .expect(0)
        .mount(&server)
        .await;

    let descriptor: RequestDescriptor<shelf_engine::PageQuery, BookListResponse> =
        RequestDescriptor::new(HttpMethod::Get, "/books");
    let err = client_for(&server).send(&descriptor).await.unwrap_err();
    assert_eq!(err, ApiError::MissingParameter);

    let relative: RequestDescriptor<shelf_engine::PageQuery, BookListResponse> =
        RequestDescriptor::new(HttpMethod::Get, "books")
            .with_params(shelf_engine::PageQuery::new(1, 20));
    let err = client_for(&server).send(&relative).await.unwrap_err();
    assert_eq!(err, ApiError::UrlEncode);
}

#[tokio::test]
async fn authenticated_call_without_token_is_a_credential_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = api::execute(&client_for(&server), ApiRequest::Logout, None)
        .await
        .unwrap_err();
    assert_eq!(err, ScreenError::MissingCredential);
}

#[tokio::test]
async fn connection_refused_is_a_request_error() {
    let settings = ClientSettings {
        scheme: "http".to_string(),
        host: "127.0.0.1:9".to_string(),
    };
    let client = ApiClient::new(settings, Arc::new(ReqwestTransport::new().unwrap()));
    let err = client.send(&api::logout("tok")).await.unwrap_err();
    assert_eq!(err, ApiError::UrlRequest);
}

#[tokio::test]
async fn image_loader_fetches_bytes_for_encoding() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/covers/1.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x89, b'P', b'N', b'G']))
        .mount(&server)
        .await;

    let loader = ReqwestImageLoader::default();
    let bytes = loader
        .load(&format!("{}/covers/1.png", server.uri()))
        .await
        .expect("image");
    assert_eq!(encode_base64(&bytes), "iVBORw==");

    let missing = loader
        .load(&format!("{}/covers/2.png", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(missing, ApiError::UrlRequest);
}
