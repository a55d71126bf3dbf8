use sqlx::PgPool;

use crate::{
    auth::{hash_password, verify_password, TokenKeys},
    error::ApiError,
    models::{AuthResponse, LoginRequest, RegisterRequest, Role, User, UserRow},
    services::{required, trimmed},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl Registration {
    pub fn parse(request: RegisterRequest) -> Result<Self, ApiError> {
        let name = required(request.name, "Name is required")?;
        let email = normalize_email(&required(request.email, "Email is required")?);
        if !email.contains('@') {
            return Err(ApiError::validation("Email is not valid"));
        }
        let password = request
            .password
            .filter(|password| !password.is_empty())
            .ok_or_else(|| ApiError::validation("Password is required"))?;
        let role = required(request.role, "Role is required")?
            .parse::<Role>()
            .map_err(|_| ApiError::validation("Role must be 'artist' or 'client'"))?;
        Ok(Self {
            name,
            email,
            password,
            role,
        })
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub async fn register(
    pool: &PgPool,
    tokens: &TokenKeys,
    request: RegisterRequest,
) -> Result<AuthResponse, ApiError> {
    let registration = Registration::parse(request)?;
    let password_hash = hash_password(&registration.password)
        .map_err(|err| ApiError::internal(format!("password hash failed: {err}")))?;

    let row = sqlx::query_as::<_, UserRow>(
        r#"INSERT INTO users (email, password_hash, name, role)
           VALUES ($1, $2, $3, $4)
           ON CONFLICT (email) DO NOTHING
           RETURNING id, email, password_hash, name, role, created_at"#,
    )
    .bind(&registration.email)
    .bind(password_hash)
    .bind(&registration.name)
    .bind(registration.role.as_str())
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::Conflict("Email is already registered".to_string()))?;

    let user = User::try_from(row)?;
    let token = tokens.issue(&user)?;
    log::info!("Registered {} account {}", user.role, user.id);
    Ok(AuthResponse { user, token })
}

/// Unknown emails and wrong passwords fail identically.
pub async fn login(
    pool: &PgPool,
    tokens: &TokenKeys,
    request: LoginRequest,
) -> Result<AuthResponse, ApiError> {
    let email = trimmed(request.email)
        .map(|email| normalize_email(&email))
        .ok_or(ApiError::InvalidCredentials)?;
    let password = request.password.unwrap_or_default();

    let row = sqlx::query_as::<_, UserRow>(
        r#"SELECT id, email, password_hash, name, role, created_at
           FROM users
           WHERE email = $1
           LIMIT 1"#,
    )
    .bind(&email)
    .fetch_optional(pool)
    .await?
    .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(&password, &row.password_hash) {
        return Err(ApiError::InvalidCredentials);
    }

    let user = User::try_from(row)?;
    let token = tokens.issue(&user)?;
    Ok(AuthResponse { user, token })
}
