//! `airlens user` command implementation

use airlens_core::auth::{self, SqliteCredentialStore};
use airlens_core::config::AppConfig;
use std::path::PathBuf;

/// Register a new user
pub async fn register(
    fullname: String,
    email: String,
    username: String,
    password: String,
    db: Option<PathBuf>,
) -> anyhow::Result<()> {
    let store = open_store(db)?;
    auth::create_user(&store, &fullname, &email, &username, &password).await?;

    println!("✓ Registered user: {}", username);
    Ok(())
}

/// Verify a username/password pair
pub async fn verify(
    username: String,
    password: String,
    db: Option<PathBuf>,
) -> anyhow::Result<()> {
    let store = open_store(db)?;

    match auth::verify_user(&store, &username, &password).await? {
        Some(user) => {
            println!("✓ Welcome, {}", user.fullname);
            Ok(())
        }
        None => anyhow::bail!("Invalid username or password"),
    }
}

fn open_store(db: Option<PathBuf>) -> anyhow::Result<SqliteCredentialStore> {
    let config = AppConfig::load()?;
    let db_path = db.unwrap_or(config.credentials.db_path);
    Ok(SqliteCredentialStore::new(db_path)?)
}
