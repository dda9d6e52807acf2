use thiserror::Error;

/// Client-side classification of every way a request can fail.
///
/// `MissingParameter`, `UrlEncode` and `JsonEncode` are raised while the
/// request is assembled and never reach the network. `UrlRequest` covers any
/// failed transfer, including non-2xx statuses. `JsonDecode` covers payloads
/// that do not match the expected response shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("request parameters are missing")]
    MissingParameter,
    #[error("request url could not be assembled")]
    UrlEncode,
    #[error("network request failed")]
    UrlRequest,
    #[error("request body could not be encoded")]
    JsonEncode,
    #[error("response could not be decoded")]
    JsonDecode,
}

/// The error a screen's network state carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScreenError {
    #[error(transparent)]
    Api(#[from] ApiError),
    /// An authenticated call was attempted with no stored token.
    #[error("not signed in")]
    MissingCredential,
}
