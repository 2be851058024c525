use super::StoreError;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::instrument;

pub type Pool = SqlitePool;

pub async fn init_pool(database_url: &str) -> Result<Pool, StoreError> {
    let mut options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let file = database_file(database_url);
    if let Some(file) = &file {
        if let Some(dir) = file.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }
        options = options.filename(file);
    }

    // every in-memory connection is its own database
    let in_memory = file.is_none();
    let pool = SqlitePoolOptions::new()
        .max_connections(if in_memory { 1 } else { 5 })
        .connect_with(options)
        .await?;
    if !in_memory {
        sqlx::query("PRAGMA journal_mode=WAL;")
            .execute(&pool)
            .await?;
    }
    Ok(pool)
}

/// File behind a `sqlite:` URL with `~/` expanded against `$HOME`.
/// `None` for in-memory databases.
fn database_file(url: &str) -> Option<PathBuf> {
    let rest = url.strip_prefix("sqlite:")?;
    let rest = rest.strip_prefix("//").unwrap_or(rest);
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path.starts_with(":memory:") {
        return None;
    }
    match (path.strip_prefix("~/"), std::env::var_os("HOME")) {
        (Some(tail), Some(home)) => Some(PathBuf::from(home).join(tail)),
        _ => Some(PathBuf::from(path)),
    }
}

pub async fn run_migrations(pool: &Pool) -> Result<(), StoreError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

#[instrument(skip(pool))]
pub async fn get_value(pool: &Pool, key: &str) -> Result<Option<String>, StoreError> {
    let value = sqlx::query_scalar::<_, String>("SELECT value FROM kv WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;
    Ok(value)
}

/// Last write wins; there is no compare-and-set.
#[instrument(skip(pool, value))]
pub async fn set_value(pool: &Pool, key: &str, value: &str) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO kv (key, value, updated_at) VALUES (?, ?, ?) \
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
    )
    .bind(key)
    .bind(value)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}

#[instrument(skip(pool))]
pub async fn remove_value(pool: &Pool, key: &str) -> Result<(), StoreError> {
    sqlx::query("DELETE FROM kv WHERE key = ?")
        .bind(key)
        .execute(pool)
        .await?;
    Ok(())
}

#[instrument(skip_all)]
pub async fn remove_all(pool: &Pool) -> Result<(), StoreError> {
    sqlx::query("DELETE FROM kv").execute(pool).await?;
    Ok(())
}
