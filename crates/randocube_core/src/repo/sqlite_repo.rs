//! SQLite catalog provider.
//!
//! # Responsibility
//! - Map `CatalogState` onto the relational schema from `sqlite_schema`.
//! - Replace the stored catalog atomically on every persist.
//!
//! # Invariants
//! - `persist` runs inside one transaction; a failed write leaves the
//!   previous catalog intact.
//! - Collection order is preserved through explicit `position` columns.

use super::sqlite_schema::{open_catalog_db, open_catalog_db_in_memory};
use super::{CatalogRepository, RepoError, RepoResult};
use crate::model::catalog::CatalogState;
use crate::model::category::CategoryList;
use crate::model::item::{Item, ItemId, Priority};
use chrono::NaiveDate;
use log::{error, info};
use rusqlite::{params, Connection, Row, Transaction};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const DATE_FORMAT: &str = "%Y-%m-%d";
const ACTIVE_TABLE: &str = "items";
const HISTORY_TABLE: &str = "history_items";
const SETTING_DEFAULT_SET_SIZE: &str = "default_set_size";
const SETTING_NEXT_ID: &str = "next_id";

/// Catalog provider backed by a migrated SQLite connection.
pub struct SqliteCatalogRepository {
    conn: Mutex<Connection>,
}

impl SqliteCatalogRepository {
    /// Opens (and migrates) the catalog database at `path`.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Ok(Self::from_connection(open_catalog_db(path)?))
    }

    /// Opens a fresh in-memory catalog database.
    pub fn in_memory() -> RepoResult<Self> {
        Ok(Self::from_connection(open_catalog_db_in_memory()?))
    }

    /// Wraps a connection that already carries the catalog schema.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn conn(&self) -> RepoResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| RepoError::Unavailable("sqlite connection lock poisoned".to_string()))
    }
}

impl CatalogRepository for SqliteCatalogRepository {
    fn load(&self) -> RepoResult<CatalogState> {
        let conn = self.conn()?;

        let categories = {
            let mut stmt = conn.prepare("SELECT name FROM categories ORDER BY position ASC;")?;
            let names = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;
            CategoryList::new(names)
        };

        let active = load_items(&conn, ACTIVE_TABLE)?;
        let history = load_items(&conn, HISTORY_TABLE)?;

        let mut last_sets: HashMap<String, Vec<Item>> = HashMap::new();
        {
            let mut stmt = conn.prepare(
                "SELECT category, item_json FROM last_set_items ORDER BY category, position;",
            )?;
            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
                let category: String = row.get(0)?;
                let item_json: String = row.get(1)?;
                let item: Item = serde_json::from_str(&item_json)?;
                last_sets.entry(category).or_default().push(item);
            }
        }

        let default_set_size = read_setting(&conn, SETTING_DEFAULT_SET_SIZE)?;
        let next_id = read_setting(&conn, SETTING_NEXT_ID)?;

        info!(
            "event=catalog_load module=repo backend=sqlite status=ok categories={} items={} history={}",
            categories.len(),
            active.len(),
            history.len()
        );

        Ok(CatalogState {
            categories,
            active,
            history,
            last_sets,
            default_set_size: usize::try_from(default_set_size).map_err(|_| {
                RepoError::InvalidData(format!(
                    "invalid default_set_size `{default_set_size}` in settings"
                ))
            })?,
            next_id: ItemId::try_from(next_id).map_err(|_| {
                RepoError::InvalidData(format!("invalid next_id `{next_id}` in settings"))
            })?,
        })
    }

    fn persist(&self, state: &CatalogState) -> RepoResult<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        if let Err(err) = write_catalog(&tx, state) {
            error!("event=catalog_persist module=repo backend=sqlite status=error error={err}");
            return Err(err);
        }
        tx.commit()?;

        info!(
            "event=catalog_persist module=repo backend=sqlite status=ok items={} history={}",
            state.active.len(),
            state.history.len()
        );
        Ok(())
    }
}

fn write_catalog(tx: &Transaction<'_>, state: &CatalogState) -> RepoResult<()> {
    tx.execute_batch(
        "DELETE FROM categories;
         DELETE FROM items;
         DELETE FROM history_items;
         DELETE FROM last_set_items;",
    )?;

    for (position, name) in state.categories.as_slice().iter().enumerate() {
        tx.execute(
            "INSERT INTO categories (position, name) VALUES (?1, ?2);",
            params![position as i64, name],
        )?;
    }

    insert_items(tx, ACTIVE_TABLE, &state.active)?;
    insert_items(tx, HISTORY_TABLE, &state.history)?;

    for (category, items) in &state.last_sets {
        for (position, item) in items.iter().enumerate() {
            tx.execute(
                "INSERT INTO last_set_items (category, position, item_json) VALUES (?1, ?2, ?3);",
                params![category, position as i64, serde_json::to_string(item)?],
            )?;
        }
    }

    write_setting(tx, SETTING_DEFAULT_SET_SIZE, state.default_set_size as i64)?;
    write_setting(tx, SETTING_NEXT_ID, i64::from(state.next_id))?;
    Ok(())
}

fn insert_items(tx: &Transaction<'_>, table: &str, items: &[Item]) -> RepoResult<()> {
    let mut stmt = tx.prepare(&format!(
        "INSERT INTO {table} (id, title, category, priority, added, completed, position)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);"
    ))?;
    for (position, item) in items.iter().enumerate() {
        let id = item.id.ok_or_else(|| {
            RepoError::InvalidData(format!("item `{}` has no id in {table}", item.title))
        })?;
        stmt.execute(params![
            id,
            item.title,
            item.category,
            priority_to_db(item.priority),
            item.added.map(|date| date.format(DATE_FORMAT).to_string()),
            item.completed.map(|date| date.format(DATE_FORMAT).to_string()),
            position as i64,
        ])?;
    }
    Ok(())
}

fn load_items(conn: &Connection, table: &str) -> RepoResult<Vec<Item>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, title, category, priority, added, completed
         FROM {table}
         ORDER BY position ASC;"
    ))?;
    let mut rows = stmt.query([])?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(parse_item_row(row, table)?);
    }
    Ok(items)
}

fn parse_item_row(row: &Row<'_>, table: &str) -> RepoResult<Item> {
    let priority_text: String = row.get("priority")?;
    let priority = parse_priority(&priority_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid priority `{priority_text}` in {table}.priority"))
    })?;

    Ok(Item {
        id: Some(row.get("id")?),
        title: row.get("title")?,
        category: row.get("category")?,
        priority,
        added: parse_date(row.get("added")?, table, "added")?,
        completed: parse_date(row.get("completed")?, table, "completed")?,
    })
}

fn parse_date(value: Option<String>, table: &str, column: &str) -> RepoResult<Option<NaiveDate>> {
    match value {
        Some(text) => NaiveDate::parse_from_str(&text, DATE_FORMAT)
            .map(Some)
            .map_err(|_| RepoError::InvalidData(format!("invalid date `{text}` in {table}.{column}"))),
        None => Ok(None),
    }
}

fn read_setting(conn: &Connection, key: &str) -> RepoResult<i64> {
    let value = conn.query_row(
        "SELECT value FROM settings WHERE key = ?1;",
        [key],
        |row| row.get::<_, i64>(0),
    )?;
    Ok(value)
}

fn write_setting(tx: &Transaction<'_>, key: &str, value: i64) -> RepoResult<()> {
    tx.execute(
        "INSERT INTO settings (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value;",
        params![key, value],
    )?;
    Ok(())
}

fn priority_to_db(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => "LOW",
        Priority::Medium => "MEDIUM",
        Priority::High => "HIGH",
    }
}

fn parse_priority(value: &str) -> Option<Priority> {
    match value {
        "LOW" => Some(Priority::Low),
        "MEDIUM" => Some(Priority::Medium),
        "HIGH" => Some(Priority::High),
        _ => None,
    }
}
