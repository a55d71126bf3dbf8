use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const ROLE_ARTIST: &str = "artist";
pub const ROLE_CLIENT: &str = "client";

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_CONFIRMED: &str = "confirmed";
pub const STATUS_CANCELLED: &str = "cancelled";

pub const EVENT_ACTIVE: &str = "active";
pub const EVENT_CANCELLED: &str = "cancelled";
pub const EVENT_COMPLETED: &str = "completed";

pub const KIND_CATALOG: &str = "catalog";
pub const KIND_DIRECT_REQUEST: &str = "direct_request";

/// A stored or submitted value outside its closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownValue {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownValue {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Artist,
    Client,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Artist => ROLE_ARTIST,
            Role::Client => ROLE_CLIENT,
        }
    }
}

impl FromStr for Role {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            ROLE_ARTIST => Ok(Role::Artist),
            ROLE_CLIENT => Ok(Role::Client),
            other => Err(UnknownValue::new("role", other)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => STATUS_PENDING,
            BookingStatus::Confirmed => STATUS_CONFIRMED,
            BookingStatus::Cancelled => STATUS_CANCELLED,
        }
    }
}

impl FromStr for BookingStatus {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            STATUS_PENDING => Ok(BookingStatus::Pending),
            STATUS_CONFIRMED => Ok(BookingStatus::Confirmed),
            STATUS_CANCELLED => Ok(BookingStatus::Cancelled),
            other => Err(UnknownValue::new("booking status", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Active,
    Cancelled,
    Completed,
}

impl EventStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EventStatus::Active => EVENT_ACTIVE,
            EventStatus::Cancelled => EVENT_CANCELLED,
            EventStatus::Completed => EVENT_COMPLETED,
        }
    }
}

impl FromStr for EventStatus {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            EVENT_ACTIVE => Ok(EventStatus::Active),
            EVENT_CANCELLED => Ok(EventStatus::Cancelled),
            EVENT_COMPLETED => Ok(EventStatus::Completed),
            other => Err(UnknownValue::new("event status", other)),
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Public view of a user; never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl TryFrom<UserRow> for User {
    type Error = UnknownValue;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            role: row.role.parse()?,
        })
    }
}

/// An artist user joined with its profile row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Artist {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub artist_name: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub image_url: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ArtistProfile {
    pub user_id: i64,
    pub artist_name: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub image_url: Option<String>,
    pub tags: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventRow {
    pub id: i64,
    pub artist_id: i64,
    pub title: String,
    pub date: NaiveDate,
    pub location: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub artist_id: i64,
    pub title: String,
    pub date: NaiveDate,
    pub location: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub status: Option<EventStatus>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = UnknownValue;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let status = row.status.as_deref().map(str::parse).transpose()?;
        Ok(Event {
            id: row.id,
            artist_id: row.artist_id,
            title: row.title,
            date: row.date,
            location: row.location,
            description: row.description,
            category: row.category,
            status,
            image_url: row.image_url,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BookingRow {
    pub id: i64,
    pub user_id: i64,
    pub kind: String,
    pub event_id: Option<i64>,
    pub artist_id: Option<i64>,
    pub event_title: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub message: Option<String>,
    pub ticket_type: Option<String>,
    pub quantity: i32,
    pub seat: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// The two booking shapes sharing the `bookings` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BookingKind {
    Catalog {
        event_id: i64,
        ticket_type: Option<String>,
        quantity: i32,
        seat: Option<String>,
    },
    DirectRequest {
        artist_id: i64,
        event_title: String,
        event_date: NaiveDate,
        message: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub user_id: i64,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: BookingKind,
}

impl TryFrom<BookingRow> for Booking {
    type Error = UnknownValue;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let kind = match (row.kind.as_str(), row.event_id, row.artist_id) {
            (KIND_CATALOG, Some(event_id), None) => BookingKind::Catalog {
                event_id,
                ticket_type: row.ticket_type,
                quantity: row.quantity,
                seat: row.seat,
            },
            (KIND_DIRECT_REQUEST, None, Some(artist_id)) => {
                match (row.event_title, row.event_date) {
                    (Some(event_title), Some(event_date)) => BookingKind::DirectRequest {
                        artist_id,
                        event_title,
                        event_date,
                        message: row.message,
                    },
                    _ => return Err(UnknownValue::new("booking shape", &row.kind)),
                }
            }
            (other, _, _) => return Err(UnknownValue::new("booking shape", other)),
        };
        Ok(Booking {
            id: row.id,
            user_id: row.user_id,
            status: row.status.parse()?,
            created_at: row.created_at,
            kind,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MyBookingRow {
    pub id: i64,
    pub kind: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub event_id: Option<i64>,
    pub artist_id: Option<i64>,
    pub event_title: String,
    pub event_date: NaiveDate,
    pub event_location: Option<String>,
    pub message: Option<String>,
    pub quantity: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingKindName {
    Catalog,
    DirectRequest,
}

/// A booking as listed for its client, with the event details resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MyBooking {
    pub id: i64,
    pub kind: BookingKindName,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub event_id: Option<i64>,
    pub artist_id: Option<i64>,
    pub event_title: String,
    pub event_date: NaiveDate,
    pub event_location: Option<String>,
    pub message: Option<String>,
    pub quantity: i32,
}

impl TryFrom<MyBookingRow> for MyBooking {
    type Error = UnknownValue;

    fn try_from(row: MyBookingRow) -> Result<Self, Self::Error> {
        let kind = match row.kind.as_str() {
            KIND_CATALOG => BookingKindName::Catalog,
            KIND_DIRECT_REQUEST => BookingKindName::DirectRequest,
            other => return Err(UnknownValue::new("booking kind", other)),
        };
        Ok(MyBooking {
            id: row.id,
            kind,
            status: row.status.parse()?,
            created_at: row.created_at,
            event_id: row.event_id,
            artist_id: row.artist_id,
            event_title: row.event_title,
            event_date: row.event_date,
            event_location: row.event_location,
            message: row.message,
            quantity: row.quantity,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub artist_name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUploaded {
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCatalogBooking {
    pub event_id: Option<i64>,
    pub ticket_type: Option<String>,
    pub quantity: Option<i32>,
    pub seat: Option<String>,
}

/// Body of an artist-direct booking request. Any client-asserted identity in
/// the payload is ignored; the acting client comes from the bearer token.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewDirectRequest {
    pub artist_id: Option<i64>,
    pub event_title: Option<String>,
    pub event_date: Option<String>,
    pub message: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking_row(kind: &str) -> BookingRow {
        BookingRow {
            id: 7,
            user_id: 2,
            kind: kind.to_string(),
            event_id: None,
            artist_id: None,
            event_title: None,
            event_date: None,
            message: None,
            ticket_type: None,
            quantity: 1,
            seat: None,
            status: STATUS_PENDING.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn catalog_row_becomes_catalog_booking() {
        let mut row = booking_row(KIND_CATALOG);
        row.event_id = Some(3);
        row.ticket_type = Some("VIP".to_string());

        let booking = Booking::try_from(row).unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);
        assert!(matches!(
            booking.kind,
            BookingKind::Catalog { event_id: 3, ref ticket_type, .. } if ticket_type.as_deref() == Some("VIP")
        ));
    }

    #[test]
    fn direct_row_without_title_is_rejected() {
        let mut row = booking_row(KIND_DIRECT_REQUEST);
        row.artist_id = Some(4);
        row.event_date = NaiveDate::from_ymd_opt(2024, 9, 1);

        assert!(Booking::try_from(row).is_err());
    }

    #[test]
    fn catalog_row_with_artist_is_rejected() {
        let mut row = booking_row(KIND_CATALOG);
        row.event_id = Some(3);
        row.artist_id = Some(4);

        assert!(Booking::try_from(row).is_err());
    }

    #[test]
    fn booking_serializes_kind_inline() {
        let mut row = booking_row(KIND_DIRECT_REQUEST);
        row.artist_id = Some(4);
        row.event_title = Some("Boda".to_string());
        row.event_date = NaiveDate::from_ymd_opt(2024, 9, 1);
        row.status = STATUS_CONFIRMED.to_string();

        let json = serde_json::to_value(Booking::try_from(row).unwrap()).unwrap();
        assert_eq!(json["kind"], "direct_request");
        assert_eq!(json["status"], "confirmed");
        assert_eq!(json["event_title"], "Boda");
        assert_eq!(json["event_date"], "2024-09-01");
    }

    #[test]
    fn unknown_status_is_reported() {
        let err = "archived".parse::<BookingStatus>().unwrap_err();
        assert_eq!(err.to_string(), "unknown booking status 'archived'");
    }

    #[test]
    fn role_round_trips_through_str() {
        assert_eq!("artist".parse::<Role>().unwrap(), Role::Artist);
        assert_eq!(Role::Client.to_string(), "client");
        assert!("admin".parse::<Role>().is_err());
    }
}
