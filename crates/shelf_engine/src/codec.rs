//! Descriptor -> wire request, and wire bytes -> typed response.
//!
//! Everything here is synchronous and runs before the transport is touched,
//! so assembly failures never produce a partial request.

use serde::de::DeserializeOwned;
use reqwest::header::{HeaderName, HeaderValue};
use serde::Serialize;
use shelf_core::ApiError;
use url::Url;

use crate::request::{HttpMethod, RequestDescriptor, RequestParams};
use crate::transport::ClientSettings;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// A fully assembled HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

pub fn encode<P, R>(
    settings: &ClientSettings,
    descriptor: &RequestDescriptor<P, R>,
) -> Result<WireRequest, ApiError>
where
    P: RequestParams,
{
    let method = descriptor.method();
    let (query, body) = match method {
        HttpMethod::Get => (Some(encode_query(descriptor.params())?), None),
        HttpMethod::Post | HttpMethod::Put | HttpMethod::Delete => {
            (None, descriptor.params().map(encode_body).transpose()?)
        }
    };
    let url = build_url(settings, descriptor.path(), query.as_deref())?;
    let headers = apply_headers(descriptor.headers());
    check_headers(&headers)?;

    Ok(WireRequest {
        method,
        url,
        headers,
        body,
    })
}

pub fn encode_query<P: RequestParams>(
    params: Option<&P>,
) -> Result<Vec<(&'static str, String)>, ApiError> {
    params
        .and_then(RequestParams::query_items)
        .ok_or(ApiError::MissingParameter)
}

pub fn encode_body<P: Serialize>(params: &P) -> Result<Vec<u8>, ApiError> {
    serde_json::to_vec(params).map_err(|_| ApiError::JsonEncode)
}

/// `Content-Type: application/json` first, then the descriptor's headers in
/// order. Names compare case-insensitively; a repeated name overwrites the
/// earlier value in place.
pub fn apply_headers(extra: &[(String, String)]) -> Vec<(String, String)> {
    let mut headers = vec![(CONTENT_TYPE.to_string(), JSON_MEDIA_TYPE.to_string())];
    for (name, value) in extra {
        match headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some(entry) => entry.1 = value.clone(),
            None => headers.push((name.clone(), value.clone())),
        }
    }
    headers
}

/// Rejects names or values HTTP cannot carry, such as a token with a line
/// break in it.
pub fn check_headers(headers: &[(String, String)]) -> Result<(), ApiError> {
    for (name, value) in headers {
        HeaderName::from_bytes(name.as_bytes()).map_err(|_| ApiError::UrlEncode)?;
        HeaderValue::from_str(value).map_err(|_| ApiError::UrlEncode)?;
    }
    Ok(())
}

pub fn build_url(
    settings: &ClientSettings,
    path: &str,
    query: Option<&[(&'static str, String)]>,
) -> Result<Url, ApiError> {
    if !path.starts_with('/') {
        return Err(ApiError::UrlEncode);
    }
    let mut url = settings.base_url()?;
    url.set_path(path);
    if let Some(items) = query {
        url.query_pairs_mut()
            .clear()
            .extend_pairs(items.iter().map(|(name, value)| (*name, value.as_str())));
    }
    Ok(url)
}

pub fn decode<R: DeserializeOwned>(bytes: &[u8]) -> Result<R, ApiError> {
    serde_json::from_slice(bytes).map_err(|_| ApiError::JsonDecode)
}
