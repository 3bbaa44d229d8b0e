//! SQLite connection bootstrap.
//!
//! Every returned connection has `foreign_keys=ON` and the hierarchy schema
//! in place. The schema is created idempotently; there is no migration
//! runner.

use crate::error::{AtlasError, Result};
use rusqlite::Connection;
use std::path::Path;
use std::time::Instant;
use tracing::{error, info};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS continents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS countries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    population INTEGER NOT NULL CHECK (population >= 0),
    official_language TEXT NOT NULL,
    currency TEXT NOT NULL,
    continent_id INTEGER NOT NULL REFERENCES continents(id)
);

CREATE TABLE IF NOT EXISTS cities (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    population INTEGER NOT NULL CHECK (population >= 0),
    latitude TEXT NOT NULL,
    longitude TEXT NOT NULL,
    country_id INTEGER NOT NULL REFERENCES countries(id)
);

CREATE INDEX IF NOT EXISTS idx_countries_continent ON countries(continent_id);
CREATE INDEX IF NOT EXISTS idx_cities_country ON cities(country_id);
"#;

/// Open (or create) a database file. Missing parent directories are created.
pub fn open(path: impl AsRef<Path>) -> Result<Connection> {
    let path = path.as_ref();
    let started = Instant::now();

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| {
            error!(path = %dir.display(), error = %e, "cannot create database directory");
            AtlasError::Unknown(format!(
                "cannot create database directory {}: {}",
                dir.display(),
                e
            ))
        })?;
    }

    let conn = Connection::open(path)?;
    bootstrap(&conn)?;
    info!(
        path = %path.display(),
        duration_ms = started.elapsed().as_millis() as u64,
        "database open"
    );
    Ok(conn)
}

/// In-memory database, used by tests and throwaway runs.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    bootstrap(&conn)?;
    Ok(conn)
}

fn bootstrap(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.execute_batch(SCHEMA)?;
    Ok(())
}
