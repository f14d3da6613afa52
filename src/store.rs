//! SQLite-backed repository store.
//!
//! One table keyed by the GitHub repository id. Saving an id that already
//! exists replaces the whole row (last write wins), so the store never
//! accumulates duplicates for a repository.

use std::path::Path;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, Row};

use crate::error::ServiceError;
use crate::models::Repository;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS repositories (
    id           INTEGER PRIMARY KEY,
    name         TEXT,
    description  TEXT,
    owner        TEXT,
    language     TEXT,
    stars        INTEGER NOT NULL DEFAULT 0,
    forks        INTEGER NOT NULL DEFAULT 0,
    last_updated TEXT
)
"#;

pub struct RepoStore {
    conn: Mutex<Connection>,
}

impl RepoStore {
    /// Open a database file (creates it if missing).
    pub fn open(path: &Path) -> Result<Self, ServiceError> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, ServiceError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, ServiceError> {
        conn.execute(SCHEMA, [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Insert or replace a repository, keyed by its GitHub id.
    pub fn upsert(&self, repo: &Repository) -> Result<(), ServiceError> {
        let conn = self.conn.lock();
        conn.execute(
            r#"
            INSERT OR REPLACE INTO repositories
                (id, name, description, owner, language, stars, forks, last_updated)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                repo.id,
                repo.name,
                repo.description,
                repo.owner,
                repo.language,
                repo.stars,
                repo.forks,
                repo.last_updated.map(|t| t.to_rfc3339()),
            ],
        )?;
        Ok(())
    }

    /// Fetch records matching the store-level filters.
    ///
    /// Absent filters pass through: `language` is an exact match when given,
    /// `min_stars` / `min_forks` are lower-bound thresholds when given.
    pub fn query(
        &self,
        language: Option<&str>,
        min_stars: Option<i64>,
        min_forks: Option<i64>,
    ) -> Result<Vec<Repository>, ServiceError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            r#"
            SELECT id, name, description, owner, language, stars, forks, last_updated
            FROM repositories
            WHERE (?1 IS NULL OR language = ?1)
              AND (?2 IS NULL OR stars >= ?2)
              AND (?3 IS NULL OR forks >= ?3)
            ORDER BY id
            "#,
        )?;

        let repos = stmt
            .query_map(params![language, min_stars, min_forks], row_to_repository)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(repos)
    }

}

fn row_to_repository(row: &Row<'_>) -> rusqlite::Result<Repository> {
    let last_updated: Option<String> = row.get(7)?;
    Ok(Repository {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        owner: row.get(3)?,
        language: row.get(4)?,
        stars: row.get(5)?,
        forks: row.get(6)?,
        // Written by `upsert` as RFC 3339; a row that fails to parse is
        // surfaced as a malformed-column error rather than silently dropped.
        last_updated: last_updated
            .map(|s| {
                DateTime::parse_from_rfc3339(&s)
                    .map(|t| t.with_timezone(&Utc))
                    .map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            7,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })
            })
            .transpose()?,
    })
}
