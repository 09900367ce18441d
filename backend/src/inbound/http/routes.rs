//! Gateway route table.
//!
//! ```text
//! ANY   /, /health                Health probe (no authentication)
//! POST  /email, /email/           Send an email
//! POST  /notifications, /notifications/  Send a push notification
//! ANY   other                     404 with the endpoint directory
//! ```
//!
//! Any other method on the send endpoints answers `405` before credentials
//! are inspected. `OPTIONS` is answered by the CORS middleware.

use actix_web::web;

use super::email::send_email;
use super::health::{health, method_not_allowed, not_found};
use super::notifications::send_notification;

/// Register every gateway route and the unknown-path fallback.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource(["/", "/health"]).to(health))
        .service(
            web::resource(["/email", "/email/"])
                .route(web::post().to(send_email))
                .default_service(web::to(method_not_allowed)),
        )
        .service(
            web::resource(["/notifications", "/notifications/"])
                .route(web::post().to(send_notification))
                .default_service(web::to(method_not_allowed)),
        )
        .default_service(web::to(not_found));
}
