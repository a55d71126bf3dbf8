use actix_web::{web, HttpResponse};

use crate::{
    auth::AuthUser,
    error::ApiError,
    models::{NewCatalogBooking, NewDirectRequest},
    services::bookings,
    state::AppState,
};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/bookings")
            .service(web::resource("").route(web::post().to(create_booking)))
            .service(web::resource("/requests").route(web::post().to(create_request)))
            .service(web::resource("/my-bookings").route(web::get().to(my_bookings))),
    );
}

async fn create_booking(
    state: web::Data<AppState>,
    auth: AuthUser,
    body: web::Json<NewCatalogBooking>,
) -> Result<HttpResponse, ApiError> {
    auth.require_client()?;
    let booking = bookings::create(&state.db, auth.id, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(booking))
}

/// The acting client is always the token holder; the body cannot name one.
async fn create_request(
    state: web::Data<AppState>,
    auth: AuthUser,
    body: web::Json<NewDirectRequest>,
) -> Result<HttpResponse, ApiError> {
    auth.require_client()?;
    let booking = bookings::create_direct(&state.db, auth.id, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(booking))
}

async fn my_bookings(
    state: web::Data<AppState>,
    auth: AuthUser,
) -> Result<HttpResponse, ApiError> {
    let bookings = bookings::list_mine(&state.db, auth.id).await?;
    Ok(HttpResponse::Ok().json(bookings))
}
