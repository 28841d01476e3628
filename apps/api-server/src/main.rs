//! # Blog API Server
//!
//! Authors, posts and tags over HTTP, backed by PostgreSQL or an
//! in-memory store.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use middleware::error::route_not_found;
use observability::RequestIdMiddleware;
use state::{AppState, Store};
use telemetry::{TelemetryConfig, init_telemetry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!("Starting Blog API Server on {}:{}", config.host, config.port);

    let store = Store::open(config.database.as_ref()).await;
    let state = web::Data::new(AppState::new(&store));

    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .configure(handlers::configure_routes)
            .default_service(web::to(route_not_found))
    })
    .bind((config.host.as_str(), config.port))?
    .run();

    let result = server.await;

    tracing::info!("Server stopped, closing store");
    store.close().await;

    result
}
