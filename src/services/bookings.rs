use chrono::NaiveDate;
use sqlx::PgPool;

use crate::{
    error::ApiError,
    models::{
        Booking, BookingRow, BookingStatus, MyBooking, MyBookingRow, NewCatalogBooking,
        NewDirectRequest, KIND_CATALOG, KIND_DIRECT_REQUEST,
    },
    services::{parse_date, required, trimmed},
};

const BOOKING_RETURNING: &str = "RETURNING id, user_id, kind, event_id, artist_id, event_title, \
                                 event_date, message, ticket_type, quantity, seat, status, created_at";

pub const MAX_TICKETS: i32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRequest {
    pub event_id: i64,
    pub ticket_type: Option<String>,
    pub quantity: i32,
    pub seat: Option<String>,
}

impl CatalogRequest {
    pub fn parse(input: NewCatalogBooking) -> Result<Self, ApiError> {
        let event_id = input
            .event_id
            .ok_or_else(|| ApiError::validation("event_id is required"))?;
        let quantity = input.quantity.unwrap_or(1);
        if !(1..=MAX_TICKETS).contains(&quantity) {
            return Err(ApiError::validation(format!(
                "Quantity must be between 1 and {MAX_TICKETS}"
            )));
        }
        Ok(Self {
            event_id,
            ticket_type: trimmed(input.ticket_type),
            quantity,
            seat: trimmed(input.seat),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectRequest {
    pub artist_id: i64,
    pub event_title: String,
    pub event_date: NaiveDate,
    pub message: Option<String>,
    pub status: BookingStatus,
}

impl DirectRequest {
    pub fn parse(input: NewDirectRequest) -> Result<Self, ApiError> {
        let artist_id = input
            .artist_id
            .ok_or_else(|| ApiError::validation("artist_id is required"))?;
        let event_title = required(input.event_title, "Event title is required")?;
        let event_date = parse_date(
            &required(input.event_date, "Event date is required")?,
            "Event date",
        )?;
        let status = match trimmed(input.status).as_deref() {
            None => BookingStatus::Confirmed,
            Some(value) => match value.parse::<BookingStatus>() {
                Ok(status @ (BookingStatus::Pending | BookingStatus::Confirmed)) => status,
                _ => {
                    return Err(ApiError::validation(
                        "Status must be 'pending' or 'confirmed'",
                    ))
                }
            },
        };
        Ok(Self {
            artist_id,
            event_title,
            event_date,
            message: trimmed(input.message),
            status,
        })
    }
}

/// Books a catalog event for `client_id`. Every booking starts out pending.
pub async fn create(
    pool: &PgPool,
    client_id: i64,
    input: NewCatalogBooking,
) -> Result<Booking, ApiError> {
    let request = CatalogRequest::parse(input)?;
    let row = sqlx::query_as::<_, BookingRow>(&format!(
        r#"INSERT INTO bookings (user_id, kind, event_id, ticket_type, quantity, seat, status)
           SELECT $1, $2, e.id, $4, $5, $6, $7
           FROM events e
           WHERE e.id = $3
           {BOOKING_RETURNING}"#
    ))
    .bind(client_id)
    .bind(KIND_CATALOG)
    .bind(request.event_id)
    .bind(&request.ticket_type)
    .bind(request.quantity)
    .bind(&request.seat)
    .bind(BookingStatus::Pending.as_str())
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Event not found"))?;

    let booking = Booking::try_from(row)?;
    log::info!(
        "Client {client_id} booked event {} (booking {})",
        request.event_id,
        booking.id
    );
    Ok(booking)
}

/// Records a free-form request addressed to an artist rather than to a
/// catalog event.
pub async fn create_direct(
    pool: &PgPool,
    client_id: i64,
    input: NewDirectRequest,
) -> Result<Booking, ApiError> {
    let request = DirectRequest::parse(input)?;
    let row = sqlx::query_as::<_, BookingRow>(&format!(
        r#"INSERT INTO bookings (user_id, kind, artist_id, event_title, event_date, message, status)
           SELECT $1, $2, u.id, $4, $5, $6, $7
           FROM users u
           WHERE u.id = $3 AND u.role = 'artist'
           {BOOKING_RETURNING}"#
    ))
    .bind(client_id)
    .bind(KIND_DIRECT_REQUEST)
    .bind(request.artist_id)
    .bind(&request.event_title)
    .bind(request.event_date)
    .bind(&request.message)
    .bind(request.status.as_str())
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Artist not found"))?;

    let booking = Booking::try_from(row)?;
    log::info!(
        "Client {client_id} sent booking request {} to artist {}",
        booking.id,
        request.artist_id
    );
    Ok(booking)
}

pub async fn list_mine(pool: &PgPool, client_id: i64) -> Result<Vec<MyBooking>, ApiError> {
    let rows = sqlx::query_as::<_, MyBookingRow>(
        r#"SELECT b.id, b.kind, b.status, b.created_at, b.event_id, b.artist_id,
                  COALESCE(e.title, b.event_title) AS event_title,
                  COALESCE(e.date, b.event_date) AS event_date,
                  e.location AS event_location,
                  b.message, b.quantity
           FROM bookings b
           LEFT JOIN events e ON b.event_id = e.id
           WHERE b.user_id = $1
           ORDER BY COALESCE(e.date, b.event_date) DESC, b.id DESC"#,
    )
    .bind(client_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| MyBooking::try_from(row).map_err(ApiError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_quantity_defaults_to_one() {
        let request = CatalogRequest::parse(NewCatalogBooking {
            event_id: Some(5),
            ..NewCatalogBooking::default()
        })
        .unwrap();
        assert_eq!(request.quantity, 1);
        assert_eq!(request.ticket_type, None);
    }

    #[test]
    fn catalog_quantity_is_bounded() {
        for quantity in [0, 11, -3] {
            let result = CatalogRequest::parse(NewCatalogBooking {
                event_id: Some(5),
                quantity: Some(quantity),
                ..NewCatalogBooking::default()
            });
            assert!(matches!(result, Err(ApiError::Validation(_))));
        }
    }

    #[test]
    fn catalog_requires_event() {
        assert!(matches!(
            CatalogRequest::parse(NewCatalogBooking::default()),
            Err(ApiError::Validation(_))
        ));
    }

    fn direct(status: Option<&str>) -> NewDirectRequest {
        NewDirectRequest {
            artist_id: Some(9),
            event_title: Some("Boda en Sucre".to_string()),
            event_date: Some("2024-12-01".to_string()),
            message: Some("  ".to_string()),
            status: status.map(str::to_string),
        }
    }

    #[test]
    fn direct_request_defaults_to_confirmed() {
        let request = DirectRequest::parse(direct(None)).unwrap();
        assert_eq!(request.status, BookingStatus::Confirmed);
        assert_eq!(request.message, None);
        assert_eq!(request.event_date, NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
    }

    #[test]
    fn direct_request_cannot_start_cancelled() {
        assert!(DirectRequest::parse(direct(Some("pending"))).is_ok());
        assert!(matches!(
            DirectRequest::parse(direct(Some("cancelled"))),
            Err(ApiError::Validation(_))
        ));
        assert!(DirectRequest::parse(direct(Some("paid"))).is_err());
    }

    #[test]
    fn direct_request_needs_title_and_date() {
        let mut input = direct(None);
        input.event_title = None;
        assert!(DirectRequest::parse(input).is_err());

        let mut input = direct(None);
        input.event_date = Some("diciembre".to_string());
        assert!(DirectRequest::parse(input).is_err());
    }
}
