use actix_web::{web, HttpResponse};

use crate::{
    error::ApiError,
    models::{LoginRequest, RegisterRequest},
    services::accounts,
    state::AppState,
};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(health)))
        .service(
            web::scope("/api/auth")
                .service(web::resource("/register").route(web::post().to(register)))
                .service(web::resource("/login").route(web::post().to(login))),
        );
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().body("ok")
}

async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let response = accounts::register(&state.db, &state.tokens, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let response = accounts::login(&state.db, &state.tokens, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}
