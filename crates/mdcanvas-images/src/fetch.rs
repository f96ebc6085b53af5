//! HTTP transport for image payloads.

use std::time::Duration;

use ureq::Agent;

/// Bounded timeout applied to every image fetch.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Some origins refuse requests without a browser user agent.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Raw bytes of a fetched image together with the reported MIME type.
#[derive(Clone, Debug)]
pub struct FetchedImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Why an image could not be fetched.
///
/// Every variant is recoverable; the resolver substitutes a placeholder.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("HTTP {status}")]
    Status { status: u16 },
    #[error("non-image content type: {0}")]
    ContentType(String),
    #[error("I/O error: {0}")]
    Io(String),
}

/// Create an HTTP agent with the given global timeout.
///
/// Non-success statuses are returned as responses, not errors, so the caller
/// can decide how to degrade.
#[must_use]
pub fn create_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

/// Fetch image bytes from a URL.
///
/// Rejects non-2xx statuses and non-`image/*` content types.
pub fn fetch_image(agent: &Agent, url: &str) -> Result<FetchedImage, FetchError> {
    let response = agent
        .get(url)
        .header("User-Agent", USER_AGENT)
        .call()
        .map_err(|e| FetchError::Http(e.to_string()))?;

    let status = response.status().as_u16();
    if !(200..300).contains(&status) {
        return Err(FetchError::Status { status });
    }

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_owned();
    let mime_type = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_owned();
    if !mime_type.starts_with("image/") {
        return Err(FetchError::ContentType(content_type));
    }

    let bytes = response
        .into_body()
        .read_to_vec()
        .map_err(|e| FetchError::Io(e.to_string()))?;

    tracing::debug!(url, bytes = bytes.len(), %mime_type, "fetched image");
    Ok(FetchedImage { mime_type, bytes })
}
