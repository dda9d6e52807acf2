use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use shelf_core::ApiError;
use shelf_logging::shelf_warn;

/// Line width of the encoded form the book service expects.
pub const BASE64_LINE_WIDTH: usize = 64;

/// Fetches the raw bytes of a picked image.
#[async_trait::async_trait]
pub trait ImageLoader: Send + Sync {
    async fn load(&self, url: &str) -> Result<Vec<u8>, ApiError>;
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestImageLoader {
    client: reqwest::Client,
}

#[async_trait::async_trait]
impl ImageLoader for ReqwestImageLoader {
    async fn load(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let parsed = reqwest::Url::parse(url).map_err(|_| ApiError::UrlEncode)?;
        let response = self.client.get(parsed).send().await.map_err(|err| {
            shelf_warn!("image fetch {url} failed: {err}");
            ApiError::UrlRequest
        })?;
        let status = response.status();
        if !status.is_success() {
            shelf_warn!("image fetch {url} returned {status}");
            return Err(ApiError::UrlRequest);
        }
        let bytes = response.bytes().await.map_err(|err| {
            shelf_warn!("image body {url} read failed: {err}");
            ApiError::UrlRequest
        })?;
        Ok(bytes.to_vec())
    }
}

/// Standard base64, broken into lines of [`BASE64_LINE_WIDTH`] characters
/// joined by CRLF. No trailing line break.
pub fn encode_base64(bytes: &[u8]) -> String {
    let encoded = STANDARD.encode(bytes);
    let breaks = encoded.len().saturating_sub(1) / BASE64_LINE_WIDTH;
    let mut out = String::with_capacity(encoded.len() + breaks * 2);
    for (index, ch) in encoded.chars().enumerate() {
        if index > 0 && index % BASE64_LINE_WIDTH == 0 {
            out.push_str("\r\n");
        }
        out.push(ch);
    }
    out
}
