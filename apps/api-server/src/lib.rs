//! # Scribe API Server
//!
//! Actix-web application: routes, extractors and error mapping over the
//! services in `scribe-core`.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod state;
pub mod telemetry;

use actix_web::web;

use state::AppState;

/// Register shared state, extractor configuration and routes.
pub fn configure_app(cfg: &mut web::ServiceConfig, state: AppState) {
    cfg.app_data(web::Data::new(state))
        .app_data(web::JsonConfig::default().error_handler(middleware::error::json_error_handler))
        .app_data(web::PathConfig::default().error_handler(middleware::error::path_error_handler));
    handlers::configure_routes(cfg);
}
