pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod uploads;

use actix_web::web;

use crate::error::ApiError;

/// Registers every API route together with the JSON and path extractor
/// settings they rely on. Expects `web::Data<AppState>` on the app.
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::validation(format!("Invalid request body: {err}")).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|_err, _req| ApiError::not_found("Resource not found").into()),
    )
    .configure(routes::public::configure)
    .configure(routes::artists::configure)
    .configure(routes::events::configure)
    .configure(routes::bookings::configure);
}
