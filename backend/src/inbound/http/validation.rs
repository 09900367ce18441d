//! Shared body-decoding helpers for inbound HTTP adapters.
//!
//! Bodies are read under the configured size limit, then parsed in two
//! steps so syntax errors (`invalid_json`) stay distinguishable from
//! well-formed JSON of the wrong shape (`validation_error`).

use actix_web::web;
use futures_util::StreamExt;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::Error;

/// Collect the request body, stopping once it grows past `limit` bytes.
///
/// # Errors
/// Returns [`Error::payload_too_large`] when the body exceeds `limit`, and
/// [`Error::invalid_json`] when the stream breaks off.
pub(crate) async fn read_body(
    mut payload: web::Payload,
    limit: usize,
) -> Result<web::BytesMut, Error> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(Error::invalid_json)?;
        if body.len().saturating_add(chunk.len()) > limit {
            return Err(Error::payload_too_large(limit));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// Parse the raw body as JSON without assuming its shape.
///
/// # Errors
/// Returns [`Error::invalid_json`] when the bytes are not valid JSON.
pub(crate) fn parse_json(body: &[u8]) -> Result<Value, Error> {
    serde_json::from_slice(body).map_err(Error::invalid_json)
}

/// Decode a parsed JSON document into a request DTO.
///
/// # Errors
/// Returns [`Error::validation`] when fields carry the wrong types.
pub(crate) fn decode_dto<T: DeserializeOwned>(value: Value) -> Result<T, Error> {
    serde_json::from_value(value)
        .map_err(|error| Error::validation(format!("Invalid request body: {error}")))
}

/// A field accepting either a single string or a list of strings.
///
/// Request DTOs hold it as `Option<OneOrMany>` so an absent field and an
/// explicit `null` both mean "no entries".
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    /// A lone value; blank strings count as no value.
    One(String),
    /// A list of values.
    Many(Vec<String>),
}

impl OneOrMany {
    /// Flatten an optional field into its entries.
    pub fn flatten(field: Option<Self>) -> Vec<String> {
        field.map(Vec::from).unwrap_or_default()
    }
}

impl From<OneOrMany> for Vec<String> {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(single) if single.trim().is_empty() => Vec::new(),
            OneOrMany::One(single) => vec![single],
            OneOrMany::Many(many) => many,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use actix_web::FromRequest;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::json;

    async fn payload_of(bytes: &'static [u8]) -> web::Payload {
        let (req, mut payload) = actix_test::TestRequest::default()
            .set_payload(bytes)
            .to_http_parts();
        web::Payload::from_request(&req, &mut payload)
            .await
            .expect("payload extractor is infallible")
    }

    #[rstest]
    #[actix_web::test]
    async fn body_within_limit_is_collected() {
        let body = read_body(payload_of(b"{\"a\":1}").await, 16)
            .await
            .expect("within limit");
        assert_eq!(&body[..], b"{\"a\":1}");
    }

    #[rstest]
    #[actix_web::test]
    async fn body_past_limit_is_too_large() {
        let error = read_body(payload_of(b"0123456789abcdef!").await, 16)
            .await
            .expect_err("one byte over");
        assert_eq!(error.code(), ErrorCode::PayloadTooLarge);
        assert!(error.message().contains("16-byte"));
    }

    #[rstest]
    fn malformed_json_is_invalid_json() {
        let error = parse_json(b"{\"to\":").expect_err("truncated body");
        assert_eq!(error.code(), ErrorCode::InvalidJson);
    }

    #[rstest]
    fn empty_body_is_invalid_json() {
        let error = parse_json(b"").expect_err("empty body");
        assert_eq!(error.code(), ErrorCode::InvalidJson);
    }

    #[derive(Debug, Deserialize)]
    struct Counter {
        #[serde(default)]
        count: u8,
    }

    #[rstest]
    fn wrong_shape_is_validation_error() {
        let error = decode_dto::<Counter>(json!({"count": "many"})).expect_err("type mismatch");
        assert_eq!(error.code(), ErrorCode::ValidationError);
    }

    #[rstest]
    fn well_formed_dto_decodes() {
        let counter = decode_dto::<Counter>(json!({"count": 3})).expect("decodes");
        assert_eq!(counter.count, 3);
    }

    #[rstest]
    #[case(json!("ada@example.com"), vec!["ada@example.com"])]
    #[case(json!(["a@example.com", "b@example.com"]), vec!["a@example.com", "b@example.com"])]
    #[case(json!(""), Vec::<&str>::new())]
    #[case(json!([]), Vec::<&str>::new())]
    #[case(Value::Null, Vec::<&str>::new())]
    fn one_or_many_flattens(#[case] raw: Value, #[case] expected: Vec<&str>) {
        let parsed: Option<OneOrMany> = serde_json::from_value(raw).expect("null, string or list");
        assert_eq!(OneOrMany::flatten(parsed), expected);
    }
}
