//! Tests for HTTP error mapping.

use super::*;
use crate::inbound::http::envelope::ErrorBody;
use crate::inbound::http::test_utils::{FIXTURE_TIMESTAMP, fixture_time};
use actix_web::body::to_bytes;
use rstest::rstest;

fn stamped(error: Error) -> ApiError {
    ApiError::new(error, fixture_time())
}

#[rstest]
#[case(Error::method_not_allowed("GET"), StatusCode::METHOD_NOT_ALLOWED)]
#[case(Error::invalid_json("eof"), StatusCode::BAD_REQUEST)]
#[case(Error::payload_too_large(16), StatusCode::PAYLOAD_TOO_LARGE)]
#[case(Error::invalid_content_type(), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized_origin(), StatusCode::FORBIDDEN)]
#[case(Error::missing_credential(), StatusCode::UNAUTHORIZED)]
#[case(Error::invalid_credential(), StatusCode::FORBIDDEN)]
#[case(Error::server_misconfigured("no key"), StatusCode::INTERNAL_SERVER_ERROR)]
#[case(Error::validation("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unsupported_platform("pager"), StatusCode::BAD_REQUEST)]
#[case(Error::collaborator("down"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&stamped(error)), status);
}

async fn response_envelope(error: Error) -> (HttpResponse<()>, Envelope<ErrorBody>) {
    let response = ResponseError::error_response(&stamped(error));
    let (response, body) = response.into_parts();
    let bytes = to_bytes(body).await.expect("reading response body succeeds");
    let envelope = serde_json::from_slice(&bytes).expect("envelope deserialisation succeeds");
    (response, envelope)
}

#[rstest]
#[actix_web::test]
async fn error_response_uses_envelope() {
    let (response, envelope) = response_envelope(Error::collaborator("provider said no")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!envelope.success);
    assert_eq!(envelope.body.error, "provider said no");
    assert_eq!(envelope.body.code, ErrorCode::CollaboratorFailure);
}

#[rstest]
#[actix_web::test]
async fn error_response_carries_stamped_time() {
    let response = ResponseError::error_response(&stamped(Error::invalid_credential()));
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let value: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
    assert_eq!(value["timestamp"], FIXTURE_TIMESTAMP);
}

#[rstest]
#[actix_web::test]
async fn missing_credential_carries_challenge() {
    let (response, _) = response_envelope(Error::missing_credential()).await;
    let challenge = response
        .headers()
        .get(WWW_AUTHENTICATE)
        .expect("challenge header")
        .to_str()
        .expect("ascii header");
    assert_eq!(challenge, "Bearer");
}

#[rstest]
#[actix_web::test]
async fn method_not_allowed_lists_allowed_methods() {
    let (response, envelope) = response_envelope(Error::method_not_allowed("PUT")).await;
    assert_eq!(
        response.headers().get(ALLOW).and_then(|v| v.to_str().ok()),
        Some(ALLOWED_METHODS)
    );
    assert_eq!(envelope.body.code, ErrorCode::MethodNotAllowed);
}

#[rstest]
#[actix_web::test]
async fn other_errors_omit_challenge() {
    let (response, _) = response_envelope(Error::invalid_credential()).await;
    assert!(response.headers().get(WWW_AUTHENTICATE).is_none());
}
