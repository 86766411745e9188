//! Catalog schema for the SQLite provider.
//!
//! # Responsibility
//! - Open file or in-memory connections ready for catalog reads and writes.
//! - Bring older catalog databases up to the current schema.
//!
//! # Invariants
//! - Schema steps are numbered from 1; the last applied step is recorded in
//!   `PRAGMA user_version`.
//! - A returned connection has every catalog table present. A database whose
//!   version claims the current schema but lacks a table is rejected rather
//!   than silently loaded as an empty catalog.

use super::{RepoError, RepoResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const SCHEMA_STEPS: [&str; 2] = [
    include_str!("schema/0001_catalog.sql"),
    include_str!("schema/0002_settings.sql"),
];

/// Schema version written by this build.
pub const SCHEMA_VERSION: u32 = SCHEMA_STEPS.len() as u32;

const CATALOG_TABLES: [&str; 5] = [
    "categories",
    "items",
    "history_items",
    "last_set_items",
    "settings",
];

/// Opens the catalog database at `path`, creating and upgrading it as needed.
pub fn open_catalog_db(path: impl AsRef<Path>) -> RepoResult<Connection> {
    open_with("file", || Connection::open(path))
}

/// Opens a fresh in-memory catalog database.
pub fn open_catalog_db_in_memory() -> RepoResult<Connection> {
    open_with("memory", Connection::open_in_memory)
}

/// Schema version recorded in the database header.
pub fn schema_version(conn: &Connection) -> RepoResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?)
}

fn open_with(
    mode: &str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> RepoResult<Connection> {
    let started_at = Instant::now();
    let mut conn = connect()?;

    if let Err(err) = prepare(&mut conn) {
        error!(
            "event=catalog_db_open module=repo status=error mode={mode} duration_ms={} error={err}",
            started_at.elapsed().as_millis()
        );
        return Err(err);
    }

    info!(
        "event=catalog_db_open module=repo status=ok mode={mode} schema={SCHEMA_VERSION} duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

fn prepare(conn: &mut Connection) -> RepoResult<()> {
    conn.busy_timeout(Duration::from_secs(5))?;

    let found = schema_version(conn)?;
    if found > SCHEMA_VERSION {
        return Err(RepoError::SchemaTooNew {
            found,
            supported: SCHEMA_VERSION,
        });
    }
    if found < SCHEMA_VERSION {
        upgrade(conn, found)?;
    }
    check_tables(conn)
}

fn upgrade(conn: &mut Connection, from: u32) -> RepoResult<()> {
    let tx = conn.transaction()?;
    for (index, sql) in SCHEMA_STEPS.iter().enumerate().skip(from as usize) {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", index as u32 + 1)?;
    }
    tx.commit()?;

    info!("event=catalog_db_upgrade module=repo status=ok from={from} to={SCHEMA_VERSION}");
    Ok(())
}

fn check_tables(conn: &Connection) -> RepoResult<()> {
    let mut stmt = conn.prepare(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
    )?;
    let mut missing = Vec::new();
    for table in CATALOG_TABLES {
        if !stmt.query_row([table], |row| row.get::<_, bool>(0))? {
            missing.push(table);
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(RepoError::InvalidData(format!(
            "catalog schema {SCHEMA_VERSION} is missing tables: {}",
            missing.join(", ")
        )))
    }
}
