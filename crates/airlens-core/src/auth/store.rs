//! SQLite-backed credential storage

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use crate::auth::User;
use crate::error::{AirlensError, Result};

/// Trait for credential storage (dependency injection)
///
/// Stores receive password hashes only; hashing and verification live in
/// the [`auth`](crate::auth) service layer.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a new user, returning the row id
    ///
    /// Fails with [`AirlensError::DuplicateCredential`] when the email or
    /// username is already taken.
    async fn insert_user(
        &self,
        fullname: &str,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<i64>;

    /// Look up a user and their stored password hash by username
    async fn find_by_username(&self, username: &str) -> Result<Option<(User, String)>>;
}

/// Local SQLite credential store
pub struct SqliteCredentialStore {
    db: Arc<Mutex<Connection>>,
}

impl SqliteCredentialStore {
    /// Open (or create) the credential database at `db_path`
    pub fn new(db_path: PathBuf) -> Result<Self> {
        // Create parent directory if needed
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        debug!(path = %db_path.display(), "Opening credential database");
        let conn = Connection::open(&db_path)?;
        init_schema(&conn)?;

        Ok(Self {
            db: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory credential store (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;

        Ok(Self {
            db: Arc::new(Mutex::new(conn)),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        // A poisoned lock only means another thread panicked mid-call; the
        // connection itself is still usable.
        self.db.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Initialize the users table schema (idempotent)
fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            fullname TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL
        )
        "#,
        [],
    )?;

    Ok(())
}

/// Map a UNIQUE violation to the duplicate-credential error naming the field
fn map_insert_error(err: rusqlite::Error) -> AirlensError {
    if let rusqlite::Error::SqliteFailure(code, Some(ref message)) = err {
        if code.code == rusqlite::ErrorCode::ConstraintViolation {
            if message.contains("users.email") {
                return AirlensError::duplicate("email");
            }
            if message.contains("users.username") {
                return AirlensError::duplicate("username");
            }
        }
    }
    AirlensError::Database(err)
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn insert_user(
        &self,
        fullname: &str,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<i64> {
        let conn = self.conn();

        conn.execute(
            r#"
            INSERT INTO users (fullname, email, username, password_hash)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![fullname, email, username, password_hash],
        )
        .map_err(map_insert_error)?;

        Ok(conn.last_insert_rowid())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<(User, String)>> {
        let conn = self.conn();

        let mut stmt = conn.prepare(
            r#"
            SELECT id, fullname, email, username, password_hash
            FROM users
            WHERE username = ?1
            "#,
        )?;

        let row = stmt
            .query_row(params![username], |row| {
                Ok((
                    User {
                        id: row.get(0)?,
                        fullname: row.get(1)?,
                        email: row.get(2)?,
                        username: row.get(3)?,
                    },
                    row.get::<_, String>(4)?,
                ))
            })
            .optional()?;

        Ok(row)
    }
}
