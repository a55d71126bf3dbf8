use sqlx::PgPool;

use crate::{
    error::ApiError,
    models::{Artist, ArtistProfile, ProfileUpdate},
    services::{required, trimmed},
};

// Inner join: artists that never saved a profile are not listed.
const ARTIST_SELECT: &str = r#"SELECT u.id, u.email, u.name, ap.artist_name, ap.bio, ap.location,
                                      ap.website, ap.image_url, ap.tags
                               FROM users u
                               JOIN artist_profiles ap ON u.id = ap.user_id
                               WHERE u.role = 'artist'"#;

const PROFILE_RETURNING: &str =
    "RETURNING user_id, artist_name, bio, location, website, image_url, tags, updated_at";

pub async fn list(pool: &PgPool) -> Result<Vec<Artist>, ApiError> {
    let rows = sqlx::query_as::<_, Artist>(&format!("{ARTIST_SELECT} ORDER BY ap.artist_name, u.id"))
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find(pool: &PgPool, id: i64) -> Result<Artist, ApiError> {
    sqlx::query_as::<_, Artist>(&format!("{ARTIST_SELECT} AND u.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Artist not found"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileFields {
    pub artist_name: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub tags: Vec<String>,
}

impl ProfileFields {
    pub fn parse(update: ProfileUpdate) -> Result<Self, ApiError> {
        let mut tags: Vec<String> = Vec::new();
        for tag in update.tags.unwrap_or_default() {
            let tag = tag.trim();
            if !tag.is_empty() && !tags.iter().any(|existing| existing == tag) {
                tags.push(tag.to_string());
            }
        }
        Ok(Self {
            artist_name: required(update.artist_name, "Artist name is required")?,
            bio: trimmed(update.bio),
            location: trimmed(update.location),
            website: trimmed(update.website),
            tags,
        })
    }
}

/// Upserts the caller's profile and copies the artist name onto the user row.
///
/// Both writes share one transaction: when the profile cannot be written,
/// the name is left untouched.
pub async fn upsert_profile(
    pool: &PgPool,
    user_id: i64,
    update: ProfileUpdate,
) -> Result<ArtistProfile, ApiError> {
    let fields = ProfileFields::parse(update)?;
    let mut tx = pool.begin().await?;

    let profile = sqlx::query_as::<_, ArtistProfile>(&format!(
        r#"INSERT INTO artist_profiles (user_id, artist_name, bio, location, website, tags)
           SELECT u.id, $2, $3, $4, $5, $6
           FROM users u
           WHERE u.id = $1 AND u.role = 'artist'
           ON CONFLICT (user_id) DO UPDATE SET
             artist_name = EXCLUDED.artist_name,
             bio = EXCLUDED.bio,
             location = EXCLUDED.location,
             website = EXCLUDED.website,
             tags = EXCLUDED.tags,
             updated_at = NOW()
           {PROFILE_RETURNING}"#
    ))
    .bind(user_id)
    .bind(&fields.artist_name)
    .bind(&fields.bio)
    .bind(&fields.location)
    .bind(&fields.website)
    .bind(&fields.tags)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| ApiError::not_found("Artist not found"))?;

    sqlx::query("UPDATE users SET name = $1, updated_at = NOW() WHERE id = $2")
        .bind(&fields.artist_name)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    log::info!("Artist {user_id} updated their profile");
    Ok(profile)
}

/// Points the profile at a stored image, creating the profile from the user's
/// name when none exists yet.
pub async fn set_profile_image(
    pool: &PgPool,
    user_id: i64,
    image_url: &str,
) -> Result<ArtistProfile, ApiError> {
    sqlx::query_as::<_, ArtistProfile>(&format!(
        r#"INSERT INTO artist_profiles (user_id, artist_name, image_url)
           SELECT u.id, u.name, $2
           FROM users u
           WHERE u.id = $1 AND u.role = 'artist'
           ON CONFLICT (user_id) DO UPDATE SET
             image_url = EXCLUDED.image_url,
             updated_at = NOW()
           {PROFILE_RETURNING}"#
    ))
    .bind(user_id)
    .bind(image_url)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Artist not found"))
}
