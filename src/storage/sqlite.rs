use anyhow::{Context, Result};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

use crate::models::{Snapshot, Table};
use crate::storage::CacheStore;

/// Per-table byte budget; oversized tables fall back to headers only.
const MAX_TABLE_BYTES: usize = 1_000_000;

pub struct SqliteCache {
    conn: Arc<Mutex<Connection>>,
    max_rows: usize,
}

impl SqliteCache {
    pub fn new(db_path: &str, max_rows: usize) -> Result<Self> {
        let conn = Connection::open(db_path).context("Failed to open snapshot cache")?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            max_rows,
        })
    }

    #[cfg(test)]
    pub fn in_memory(max_rows: usize) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            max_rows,
        })
    }
}

#[async_trait]
impl CacheStore for SqliteCache {
    async fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS snapshots (
                sheet TEXT PRIMARY KEY,
                headers TEXT NOT NULL,
                rows TEXT NOT NULL,
                saved_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS session (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;

        info!("Cache migration completed");
        Ok(())
    }

    async fn load(&self) -> Result<Option<Snapshot>> {
        let conn = self.conn.lock().unwrap();
        let mut statement = conn.prepare("SELECT sheet, headers, rows FROM snapshots")?;
        let mut records = statement.query([])?;

        let mut snapshot = Snapshot::default();
        while let Some(record) = records.next()? {
            let sheet: String = record.get(0)?;
            let headers: String = record.get(1)?;
            let rows: String = record.get(2)?;
            let table = match (serde_json::from_str(&headers), serde_json::from_str(&rows)) {
                (Ok(headers), Ok(rows)) => Table { headers, rows },
                _ => {
                    warn!("Discarding cache: sheet '{}' is unreadable", sheet);
                    return Ok(None);
                }
            };
            snapshot.tables.insert(sheet, table);
        }

        if snapshot.is_empty() {
            return Ok(None);
        }
        Ok(Some(snapshot))
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM snapshots", [])?;
        for (sheet, table) in &snapshot.tables {
            let bounded = table.truncated(self.max_rows);
            let headers = serde_json::to_string(&bounded.headers)?;
            let mut rows = serde_json::to_string(&bounded.rows)?;
            if rows.len() > MAX_TABLE_BYTES {
                warn!("Sheet '{}' exceeds the cache budget; keeping headers only", sheet);
                rows = "[]".to_string();
            }
            tx.execute(
                "INSERT OR REPLACE INTO snapshots (sheet, headers, rows) VALUES (?1, ?2, ?3)",
                params![sheet, headers, rows],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM snapshots", [])?;
        conn.execute("DELETE FROM session", [])?;
        Ok(())
    }

    async fn active_nis(&self) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let value = conn
            .query_row(
                "SELECT value FROM session WHERE key = 'active_nis'",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    async fn set_active_nis(&self, nis: Option<&str>) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        match nis {
            Some(value) => {
                conn.execute(
                    "INSERT OR REPLACE INTO session (key, value) VALUES ('active_nis', ?1)",
                    params![value],
                )?;
            }
            None => {
                conn.execute("DELETE FROM session WHERE key = 'active_nis'", [])?;
            }
        }
        Ok(())
    }
}
