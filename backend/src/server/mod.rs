//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use comms_gateway::inbound::http::routes;
use comms_gateway::inbound::http::state::HttpState;
use comms_gateway::{Cors, Trace};

fn build_app(
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(http_state)
        .wrap(Cors)
        .wrap(Trace)
        .configure(routes::configure)
}

/// Construct an Actix HTTP server for the supplied configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(config: ServerConfig) -> std::io::Result<Server> {
    let bind_addr = config.bind_addr();
    let ServerConfig { gateway, ports, .. } = config;
    let http_state = web::Data::new(HttpState::new(gateway, ports));

    let server = HttpServer::new(move || build_app(http_state.clone()))
        .bind(bind_addr)?
        .run();
    Ok(server)
}
