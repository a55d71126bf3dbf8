use sqlx::PgPool;

use crate::{auth::TokenKeys, config::UploadConfig};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub tokens: TokenKeys,
    pub uploads: UploadConfig,
}

impl AppState {
    pub fn new(db: PgPool, jwt_secret: &str, uploads: UploadConfig) -> Self {
        Self {
            db,
            tokens: TokenKeys::new(jwt_secret.as_bytes()),
            uploads,
        }
    }
}
