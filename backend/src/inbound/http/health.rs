//! Unauthenticated health and fallback responses.

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, web};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::state::HttpState;
use crate::domain::Error;
use crate::inbound::http::ApiResult;

/// Public paths served by the gateway.
pub const AVAILABLE_ENDPOINTS: [&str; 3] = ["/email", "/notifications", "/health"];

const SERVICE_NAME: &str = "comms-gateway";

/// Endpoint directory advertised by the health probe.
#[derive(Debug, Serialize)]
pub struct EndpointDirectory {
    email: &'static str,
    notifications: &'static str,
    health: &'static str,
}

/// Health probe body.
#[derive(Debug, Serialize)]
pub struct HealthReport {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    endpoints: EndpointDirectory,
    timestamp: DateTime<Utc>,
}

/// Body returned for unknown paths.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotFoundBody {
    error: &'static str,
    message: String,
    path: String,
    available_endpoints: [&'static str; 3],
}

/// Liveness probe; any method, no authentication.
pub async fn health(state: web::Data<HttpState>) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(HealthReport {
            status: "healthy",
            service: SERVICE_NAME,
            version: env!("CARGO_PKG_VERSION"),
            endpoints: EndpointDirectory {
                email: "POST /email",
                notifications: "POST /notifications",
                health: "GET /health",
            },
            timestamp: state.clock.utc(),
        })
}

/// Fallback for unknown paths.
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(NotFoundBody {
        error: "Not Found",
        message: format!("No endpoint is served at {}", req.path()),
        path: req.path().to_owned(),
        available_endpoints: AVAILABLE_ENDPOINTS,
    })
}

/// Fallback for unsupported methods on the send endpoints.
pub async fn method_not_allowed(
    req: HttpRequest,
    state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    Err(state.reject(Error::method_not_allowed(req.method().as_str())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GatewayConfig, OriginPolicy};
    use crate::inbound::http::test_utils::{FIXTURE_TIMESTAMP, state_with_config};
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[actix_web::test]
    async fn health_reports_service_and_endpoints() {
        let state = state_with_config(GatewayConfig::new(None, OriginPolicy::Any, None));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .route("/health", web::to(health)),
        )
        .await;
        let res = test::call_service(
            &app,
            test::TestRequest::delete().uri("/health").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers()
                .get(header::CACHE_CONTROL)
                .and_then(|v| v.to_str().ok()),
            Some("no-store")
        );
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], SERVICE_NAME);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(body["endpoints"]["email"], "POST /email");
        assert_eq!(body["timestamp"], FIXTURE_TIMESTAMP);
    }

    #[rstest]
    #[actix_web::test]
    async fn unknown_path_echoes_path() {
        let app = test::init_service(App::new().default_service(web::to(not_found))).await;
        let res =
            test::call_service(&app, test::TestRequest::get().uri("/sms").to_request()).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["path"], "/sms");
        assert_eq!(
            body["availableEndpoints"],
            json!(["/email", "/notifications", "/health"])
        );
    }
}
