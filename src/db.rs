use std::{fs, io, path::Path};

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    auth::hash_password,
    config::DatabaseConfig,
    error::ApiError,
    models::{ROLE_ARTIST, ROLE_CLIENT},
};

const DEMO_PASSWORD: &str = "password";

pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, Box<dyn std::error::Error>> {
    let options = config.connect_options()?;
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

pub fn ensure_upload_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

struct DemoArtist {
    name: &'static str,
    email: &'static str,
    bio: &'static str,
    location: &'static str,
    website: &'static str,
    tags: &'static [&'static str],
}

struct DemoEvent {
    artist: usize,
    title: &'static str,
    date: &'static str,
    location: &'static str,
    description: &'static str,
    category: &'static str,
}

const DEMO_ARTISTS: &[DemoArtist] = &[
    DemoArtist {
        name: "Maria Juana",
        email: "juana@promibol.com",
        bio: "Grupo folklórico de renombre, fusionando tradición y modernidad.",
        location: "Cochabamba",
        website: "https://mariajuanabo.com",
        tags: &["folklore", "fusión"],
    },
    DemoArtist {
        name: "Octavia",
        email: "octavia@promibol.com",
        bio: "Banda de rock icónica de Bolivia, con una trayectoria de más de 30 años.",
        location: "La Paz",
        website: "https://octavia.bo",
        tags: &["rock", "pop", "alternativo"],
    },
    DemoArtist {
        name: "Chila Jatun",
        email: "chila@promibol.com",
        bio: "El legado de los Kjarkas, llevando el folklore boliviano a nuevas generaciones.",
        location: "Cochabamba",
        website: "https://chilajatun.com",
        tags: &["folklore", "caporal", "tinku"],
    },
];

const DEMO_EVENTS: &[DemoEvent] = &[
    DemoEvent {
        artist: 1,
        title: "Concierto Acústico: Octavia",
        date: "2024-08-15",
        location: "Teatro Municipal Alberto Saavedra Pérez, La Paz",
        description: "Una noche íntima con los grandes éxitos de Octavia en formato acústico.",
        category: "Concierto",
    },
    DemoEvent {
        artist: 2,
        title: "Festival del Charango: Chila Jatun",
        date: "2024-09-05",
        location: "Palacio de los Deportes, Cochabamba",
        description: "Chila Jatun presenta su nuevo disco en un festival lleno de folklore y energía.",
        category: "Festival",
    },
    DemoEvent {
        artist: 0,
        title: "Noche de Taquiraris: Maria Juana",
        date: "2024-09-22",
        location: "Feria Exposición, Santa Cruz",
        description: "Maria Juana celebra a Santa Cruz con un repertorio lleno de taquiraris y carnavalitos.",
        category: "Concierto",
    },
];

/// Inserts demo artists, a client and events into an empty database.
pub async fn seed_demo_data(pool: &PgPool) -> Result<(), ApiError> {
    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    if users > 0 {
        log::info!("Database already has users, skipping demo seed");
        return Ok(());
    }

    log::warn!("Seeding demo accounts with the password '{DEMO_PASSWORD}'. Do not enable SEED_DEMO_DATA in production.");
    let password_hash = hash_password(DEMO_PASSWORD)
        .map_err(|err| ApiError::internal(format!("password hash failed: {err}")))?;

    let mut tx = pool.begin().await?;
    let mut artist_ids = Vec::with_capacity(DEMO_ARTISTS.len());
    for artist in DEMO_ARTISTS {
        let id: i64 = sqlx::query_scalar(
            r#"INSERT INTO users (email, password_hash, name, role)
               VALUES ($1, $2, $3, $4)
               RETURNING id"#,
        )
        .bind(artist.email)
        .bind(&password_hash)
        .bind(artist.name)
        .bind(ROLE_ARTIST)
        .fetch_one(&mut *tx)
        .await?;

        let tags: Vec<String> = artist.tags.iter().map(|tag| tag.to_string()).collect();
        sqlx::query(
            r#"INSERT INTO artist_profiles (user_id, artist_name, bio, location, website, tags)
               VALUES ($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(id)
        .bind(artist.name)
        .bind(artist.bio)
        .bind(artist.location)
        .bind(artist.website)
        .bind(tags)
        .execute(&mut *tx)
        .await?;
        artist_ids.push(id);
    }

    sqlx::query(
        r#"INSERT INTO users (email, password_hash, name, role)
           VALUES ($1, $2, $3, $4)"#,
    )
    .bind("cliente@promibol.com")
    .bind(&password_hash)
    .bind("Cliente Ejemplo")
    .bind(ROLE_CLIENT)
    .execute(&mut *tx)
    .await?;

    for event in DEMO_EVENTS {
        sqlx::query(
            r#"INSERT INTO events (artist_id, title, date, location, description, category, status)
               VALUES ($1, $2, $3::date, $4, $5, $6, 'active')"#,
        )
        .bind(artist_ids[event.artist])
        .bind(event.title)
        .bind(event.date)
        .bind(event.location)
        .bind(event.description)
        .bind(event.category)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    log::info!(
        "Seeded {} artists, 1 client and {} events",
        DEMO_ARTISTS.len(),
        DEMO_EVENTS.len()
    );
    Ok(())
}
