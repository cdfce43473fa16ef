//! Startup bootstrap: ensure a superadmin credential exists.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use devmarket_auth::Role;

use crate::config::ServerConfig;
use crate::db::Database;
use crate::error::ApiError;

/// Hash a password using argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {}", e)))
}

/// Verify a password against a stored argon2id hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ApiError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| ApiError::Internal(format!("stored hash unparseable: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Upsert the superadmin user from `ADMIN_EMAIL`/`ADMIN_PASSWORD`.
///
/// Idempotent: re-running replaces the password hash and restores the
/// SUPERADMIN role, mirroring the operator reset script.
pub fn ensure_superadmin(db: &Database, config: &ServerConfig) -> Result<i64, ApiError> {
    let hash = hash_password(&config.admin_password)?;
    let id = db.upsert_user(
        &config.admin_email,
        "Super Admin",
        &hash,
        Role::SuperAdmin.as_str(),
    )?;
    tracing::info!("Superadmin upserted: {}", config.admin_email);
    Ok(id)
}
