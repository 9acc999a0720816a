//! Database connection and initialization.

use anyhow::{Context, Result};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Database connection wrapper.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Get the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Initialize the SQLite database.
///
/// Creates the database file if it doesn't exist, applies the bundled
/// schema, and returns a connection pool.
pub async fn init_database(db_path: &str, max_connections: u32) -> Result<Database> {
    let in_memory = db_path == ":memory:";

    // Ensure parent directory exists
    if !in_memory {
        if let Some(parent) = Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
    }

    let db_url = if in_memory {
        "sqlite::memory:".to_string()
    } else {
        format!("sqlite:{}?mode=rwc", db_path)
    };

    info!("Connecting to database: {}", db_path);

    // An in-memory database lives and dies with its connection, so keep
    // exactly one and never recycle it.
    let options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(max_connections.max(1))
    };
    let pool = options
        .connect(&db_url)
        .await
        .with_context(|| format!("Failed to open database {}", db_path))?;

    apply_schema(&pool).await?;

    Ok(Database { pool })
}

/// Apply the bundled schema. Every statement is idempotent.
async fn apply_schema(pool: &SqlitePool) -> Result<()> {
    let schema_sql = include_str!("../../migrations/001_init.sql");

    info!("Applying database schema...");

    for statement in schema_sql.split(';') {
        // Remove comment lines and trim whitespace
        let statement: String = statement
            .lines()
            .filter(|line| !line.trim().starts_with("--"))
            .collect::<Vec<_>>()
            .join("\n");
        let statement = statement.trim();
        if statement.is_empty() {
            continue;
        }

        sqlx::query(statement)
            .execute(pool)
            .await
            .with_context(|| format!("Schema statement failed: {}", statement))?;
    }

    info!("Database schema ready");
    Ok(())
}
