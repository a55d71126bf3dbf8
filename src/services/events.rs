use chrono::NaiveDate;
use sqlx::PgPool;

use crate::{
    error::ApiError,
    models::{Event, EventRow, EventStatus, NewEvent},
    services::{parse_date, required, trimmed},
};

const EVENT_COLUMNS: &str =
    "id, artist_id, title, date, location, description, category, status, image_url, created_at";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub date: NaiveDate,
    pub location: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub status: EventStatus,
}

impl EventDraft {
    pub fn parse(input: NewEvent) -> Result<Self, ApiError> {
        let title = required(input.title, "Title is required")?;
        let date = parse_date(&required(input.date, "Date is required")?, "Date")?;
        let location = required(input.location, "Location is required")?;
        let status = match trimmed(input.status) {
            Some(status) => status.parse::<EventStatus>().map_err(|_| {
                ApiError::validation("Status must be 'active', 'cancelled' or 'completed'")
            })?,
            None => EventStatus::Active,
        };
        Ok(Self {
            title,
            date,
            location,
            description: trimmed(input.description),
            category: trimmed(input.category),
            image_url: trimmed(input.image_url),
            status,
        })
    }
}

fn into_events(rows: Vec<EventRow>) -> Result<Vec<Event>, ApiError> {
    rows.into_iter()
        .map(|row| Event::try_from(row).map_err(ApiError::from))
        .collect()
}

pub async fn list(pool: &PgPool) -> Result<Vec<Event>, ApiError> {
    let rows = sqlx::query_as::<_, EventRow>(&format!(
        "SELECT {EVENT_COLUMNS} FROM events ORDER BY date DESC, id DESC"
    ))
    .fetch_all(pool)
    .await?;
    into_events(rows)
}

pub async fn list_by_artist(pool: &PgPool, artist_id: i64) -> Result<Vec<Event>, ApiError> {
    let rows = sqlx::query_as::<_, EventRow>(&format!(
        "SELECT {EVENT_COLUMNS} FROM events WHERE artist_id = $1 ORDER BY date DESC, id DESC"
    ))
    .bind(artist_id)
    .fetch_all(pool)
    .await?;
    into_events(rows)
}

/// Persists an event owned by `owner_id`, the authenticated caller.
pub async fn create(pool: &PgPool, owner_id: i64, input: NewEvent) -> Result<Event, ApiError> {
    let draft = EventDraft::parse(input)?;
    let row = sqlx::query_as::<_, EventRow>(&format!(
        r#"INSERT INTO events (artist_id, title, date, location, description, category, status, image_url)
           VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
           RETURNING {EVENT_COLUMNS}"#
    ))
    .bind(owner_id)
    .bind(&draft.title)
    .bind(draft.date)
    .bind(&draft.location)
    .bind(&draft.description)
    .bind(&draft.category)
    .bind(draft.status.as_str())
    .bind(&draft.image_url)
    .fetch_one(pool)
    .await?;

    let event = Event::try_from(row)?;
    log::info!("Artist {owner_id} created event {}", event.id);
    Ok(event)
}

/// Deletes an event owned by `caller_id`. Someone else's event is reported
/// exactly like a missing one.
pub async fn delete(pool: &PgPool, event_id: i64, caller_id: i64) -> Result<(), ApiError> {
    let result = sqlx::query("DELETE FROM events WHERE id = $1 AND artist_id = $2")
        .bind(event_id)
        .bind(caller_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Event not found"));
    }
    log::info!("Artist {caller_id} deleted event {event_id}");
    Ok(())
}
