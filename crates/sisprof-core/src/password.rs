//! Password hashing, verification and generation.
//!
//! Hashes are bcrypt with a per-hash random salt. Generated passwords are
//! alphanumeric and are meant to be shown to a person exactly once.

use bcrypt::{DEFAULT_COST, hash, verify};
use rand::{Rng, distributions::Alphanumeric};

use crate::errors::AppError;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash_password_with_cost(password, DEFAULT_COST)
}

pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, AppError> {
    hash(password, cost)
        .map_err(|e| AppError::internal_error(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(password, hash)
        .map_err(|e| AppError::internal_error(format!("Failed to verify password: {}", e)))
}

/// Random alphanumeric password of exactly `length` characters.
pub fn generate_password(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
