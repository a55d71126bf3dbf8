use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};

use crate::{
    auth::AuthUser,
    error::ApiError,
    models::{ImageUploaded, ProfileUpdate},
    services::{artists, events},
    state::AppState,
    uploads,
};

pub fn configure(cfg: &mut web::ServiceConfig) {
    // Fixed segments first so `/{id}` does not swallow them.
    cfg.service(
        web::scope("/api/artists")
            .service(web::resource("").route(web::get().to(list_artists)))
            .service(web::resource("/profile").route(web::put().to(update_profile)))
            .service(web::resource("/upload-image").route(web::post().to(upload_image)))
            .service(web::resource("/{id}").route(web::get().to(get_artist)))
            .service(web::resource("/{id}/events").route(web::get().to(artist_events))),
    );
}

async fn list_artists(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let artists = artists::list(&state.db).await?;
    Ok(HttpResponse::Ok().json(artists))
}

async fn get_artist(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let artist = artists::find(&state.db, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(artist))
}

async fn artist_events(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let events = events::list_by_artist(&state.db, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(events))
}

async fn update_profile(
    state: web::Data<AppState>,
    auth: AuthUser,
    body: web::Json<ProfileUpdate>,
) -> Result<HttpResponse, ApiError> {
    auth.require_artist()?;
    let profile = artists::upsert_profile(&state.db, auth.id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(profile))
}

async fn upload_image(
    state: web::Data<AppState>,
    auth: AuthUser,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    auth.require_artist()?;
    let upload = uploads::read_image(payload, state.uploads.max_bytes).await?;
    let file_name = uploads::store_image(&state.uploads.dir, &upload).await?;
    let image_url = uploads::public_url(&file_name);

    if let Err(err) = artists::set_profile_image(&state.db, auth.id, &image_url).await {
        uploads::discard_image(&state.uploads.dir, &file_name).await;
        return Err(err);
    }

    log::info!("Artist {} uploaded profile image {file_name}", auth.id);
    Ok(HttpResponse::Ok().json(ImageUploaded { image_url }))
}
