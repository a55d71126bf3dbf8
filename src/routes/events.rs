use actix_web::{web, HttpResponse};

use crate::{
    auth::AuthUser,
    error::ApiError,
    models::{MessageResponse, NewEvent},
    services::events,
    state::AppState,
};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/events")
            .service(
                web::resource("")
                    .route(web::get().to(list_events))
                    .route(web::post().to(create_event)),
            )
            .service(web::resource("/{id}").route(web::delete().to(delete_event))),
    );
}

async fn list_events(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let events = events::list(&state.db).await?;
    Ok(HttpResponse::Ok().json(events))
}

async fn create_event(
    state: web::Data<AppState>,
    auth: AuthUser,
    body: web::Json<NewEvent>,
) -> Result<HttpResponse, ApiError> {
    auth.require_artist()?;
    let event = events::create(&state.db, auth.id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(event))
}

async fn delete_event(
    state: web::Data<AppState>,
    auth: AuthUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    auth.require_artist()?;
    events::delete(&state.db, path.into_inner(), auth.id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Event deleted".to_string(),
    }))
}
