//! Permissive CORS layer for browser callers.
//!
//! `OPTIONS` on any path is answered here without reaching routing or
//! authentication. Every other response, success or error, is stamped with
//! the same allow headers.

use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::Method;
use actix_web::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_MAX_AGE, HeaderMap, HeaderName, HeaderValue,
};
use actix_web::{Error, HttpResponse};
use futures_util::future::{LocalBoxFuture, Ready, ready};

const ALLOW_ORIGIN: &str = "*";
const ALLOW_METHODS: &str = "POST, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, Authorization";
const PREFLIGHT_MAX_AGE_SECS: &str = "86400";

const RESPONSE_HEADERS: [(HeaderName, &str); 3] = [
    (ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW_ORIGIN),
    (ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS),
    (ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS),
];

fn stamp(headers: &mut HeaderMap) {
    for (name, value) in RESPONSE_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
}

fn preflight_response() -> HttpResponse {
    let mut response = HttpResponse::Ok().finish();
    let headers = response.headers_mut();
    stamp(headers);
    headers.insert(
        ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static(PREFLIGHT_MAX_AGE_SECS),
    );
    response
}

/// Middleware factory answering preflights and stamping CORS headers.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use comms_gateway::Cors;
///
/// let _app = App::new().wrap(Cors);
/// ```
#[derive(Clone)]
pub struct Cors;

impl<S, B> Transform<S, ServiceRequest> for Cors
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = CorsMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CorsMiddleware { service }))
    }
}

/// Service produced by [`Cors`].
pub struct CorsMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for CorsMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if req.method() == Method::OPTIONS {
            let res = req.into_response(preflight_response()).map_into_right_body();
            return Box::pin(ready(Ok(res)));
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let mut res = fut.await?;
            stamp(res.headers_mut());
            Ok(res.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use rstest::rstest;

    fn header<B>(res: &ServiceResponse<B>, name: HeaderName) -> Option<&str> {
        res.headers().get(name).and_then(|value| value.to_str().ok())
    }

    #[rstest]
    #[case("/email")]
    #[case("/anything/else")]
    #[actix_web::test]
    async fn preflight_short_circuits(#[case] path: &str) {
        let app = test::init_service(App::new().wrap(Cors).route(
            "/email",
            web::post().to(|| async { HttpResponse::Unauthorized().finish() }),
        ))
        .await;
        let res = test::call_service(
            &app,
            test::TestRequest::default()
                .method(Method::OPTIONS)
                .uri(path)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(header(&res, ACCESS_CONTROL_ALLOW_ORIGIN), Some("*"));
        assert_eq!(header(&res, ACCESS_CONTROL_ALLOW_METHODS), Some("POST, OPTIONS"));
        assert_eq!(
            header(&res, ACCESS_CONTROL_ALLOW_HEADERS),
            Some("Content-Type, Authorization")
        );
        assert_eq!(header(&res, ACCESS_CONTROL_MAX_AGE), Some("86400"));
    }

    #[rstest]
    #[actix_web::test]
    async fn error_responses_carry_allow_origin() {
        let app = test::init_service(App::new().wrap(Cors).route(
            "/email",
            web::post().to(|| async { HttpResponse::Forbidden().finish() }),
        ))
        .await;
        let res =
            test::call_service(&app, test::TestRequest::post().uri("/email").to_request()).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        assert_eq!(header(&res, ACCESS_CONTROL_ALLOW_ORIGIN), Some("*"));
        assert!(header(&res, ACCESS_CONTROL_MAX_AGE).is_none());
    }
}
