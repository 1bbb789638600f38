use sea_orm::DbErr;
use thiserror::Error;

use crate::auth::password::{MAX_COST, MIN_COST};

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Invalid database configuration: {0}")]
    Config(String),

    #[error("Error connecting to database: {0}")]
    Connect(#[source] DbErr),

    #[error("Database error: {0}")]
    Query(#[from] DbErr),

    #[error("Connection still has open cursors")]
    CursorsOpen,
}

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Unsupported bcrypt cost {0} (expected {} to {})", MIN_COST, MAX_COST)]
    InvalidCost(u32),

    #[error("Password hashing error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}
