use thiserror::Error;

use crate::domain::{Cents, MAX_AMOUNT_CENTS};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Username must not be empty")]
    InvalidUsername,

    #[error("User already exists: {0}")]
    UserAlreadyExists(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid amount {}: must be between 0 and {} cents", .0, MAX_AMOUNT_CENTS)]
    InvalidAmount(Cents),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}
