//! Transport helpers shared by the reqwest relay adapters.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use zeroize::Zeroizing;

/// Errors raised while constructing a relay adapter.
#[derive(Debug, thiserror::Error)]
pub enum RelayBuildError {
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    /// The endpoint cannot carry path segments.
    #[error("endpoint '{0}' cannot be used as a base URL")]
    InvalidEndpoint(Url),
}

/// Bearer credential presented to a provider.
#[derive(Clone)]
pub(crate) struct AccessKey(Zeroizing<String>);

impl AccessKey {
    pub(crate) fn new(raw: Option<String>) -> Option<Self> {
        raw.filter(|value| !value.trim().is_empty())
            .map(|value| Self(Zeroizing::new(value)))
    }

    pub(crate) fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

pub(crate) fn build_client(timeout: Duration) -> Result<Client, RelayBuildError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Append `segments` to the endpoint path.
pub(crate) fn append_segments<'a>(
    endpoint: Url,
    segments: impl IntoIterator<Item = &'a str>,
) -> Result<Url, RelayBuildError> {
    let mut url = endpoint.clone();
    url.path_segments_mut()
        .map_err(|()| RelayBuildError::InvalidEndpoint(endpoint))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Describe a non-success provider response.
pub(crate) fn status_message(status: StatusCode, body: &[u8]) -> String {
    let preview = body_preview(body);
    if preview.is_empty() {
        format!("provider answered status {}", status.as_u16())
    } else {
        format!("provider answered status {}: {preview}", status.as_u16())
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 200;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        let head: String = compact.chars().take(PREVIEW_CHAR_LIMIT).collect();
        format!("{head}...")
    } else {
        compact
    }
}

/// Label for a transport failure, distinguishing timeouts.
pub(crate) fn transport_message(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("timed out: {error}")
    } else {
        error.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://hub.example", Some("alerts"), "https://hub.example/alerts/messages")]
    #[case("https://hub.example/api/", Some("alerts"), "https://hub.example/api/alerts/messages")]
    #[case("https://hub.example/api", None, "https://hub.example/api/messages")]
    fn appends_path_segments(
        #[case] base: &str,
        #[case] hub: Option<&str>,
        #[case] expected: &str,
    ) {
        let base = Url::parse(base).expect("valid base");
        let url = append_segments(base, hub.into_iter().chain(["messages"])).expect("joinable");
        assert_eq!(url.as_str(), expected);
    }

    #[rstest]
    fn rejects_opaque_endpoints() {
        let base = Url::parse("mailto:ops@example.com").expect("valid url");
        assert!(matches!(
            append_segments(base, ["messages"]),
            Err(RelayBuildError::InvalidEndpoint(_))
        ));
    }

    #[rstest]
    fn status_message_compacts_body() {
        let message = status_message(StatusCode::BAD_REQUEST, b"{\n  \"error\": \"bad sender\"\n}");
        assert_eq!(message, "provider answered status 400: { \"error\": \"bad sender\" }");
    }

    #[rstest]
    fn status_message_truncates_long_bodies() {
        let body = "x".repeat(500);
        let message = status_message(StatusCode::BAD_GATEWAY, body.as_bytes());
        assert!(message.ends_with("..."));
        assert!(message.len() < 260);
    }

    #[rstest]
    fn blank_access_key_is_absent() {
        assert!(AccessKey::new(Some("  ".to_owned())).is_none());
        assert_eq!(
            AccessKey::new(Some("k".to_owned())).map(|key| key.as_str().to_owned()),
            Some("k".to_owned())
        );
    }
}
