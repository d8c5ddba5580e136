//! User registration and verification
//!
//! Passwords never reach the store in the clear: registration salts and
//! hashes them, verification recomputes the digest against the stored
//! salt. The stored form is `salt$hex(sha256(salt || password))` with a
//! random per-user salt.

use sha2::{Digest, Sha256};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::Result;

pub mod store;

pub use store::{CredentialStore, SqliteCredentialStore};

/// A registered user, without credential material
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub fullname: String,
    pub email: String,
    pub username: String,
}

/// Register a new user, returning their row id
///
/// Fails with a duplicate-credential error when the email or username is
/// already taken.
pub async fn create_user(
    store: &dyn CredentialStore,
    fullname: &str,
    email: &str,
    username: &str,
    password: &str,
) -> Result<i64> {
    let password_hash = hash_password(password);
    let id = store
        .insert_user(fullname, email, username, &password_hash)
        .await?;

    info!(username, id, "User registered");
    Ok(id)
}

/// Check a username/password pair against the store
///
/// Returns the matched user, or `None` when the username is unknown or
/// the password does not match. The two cases are indistinguishable to
/// the caller.
pub async fn verify_user(
    store: &dyn CredentialStore,
    username: &str,
    password: &str,
) -> Result<Option<User>> {
    let Some((user, stored_hash)) = store.find_by_username(username).await? else {
        debug!(username, "Verification failed: unknown username");
        return Ok(None);
    };

    if verify_password(&stored_hash, password) {
        debug!(username, "Verification succeeded");
        Ok(Some(user))
    } else {
        debug!(username, "Verification failed: password mismatch");
        Ok(None)
    }
}

/// Salt and hash a password for storage
fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    let digest = salted_digest(&salt, password);
    format!("{salt}${digest}")
}

/// Check a password against a stored `salt$digest` value
fn verify_password(stored: &str, password: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, digest)) => salted_digest(salt, password) == digest,
        None => false,
    }
}

fn salted_digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
