mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::models::{MonthKey, MonthRecord};

/// Every recorded month, keyed chronologically.
pub(crate) type MonthMap = BTreeMap<MonthKey, MonthRecord>;

/// Where the budget store writes its state. Each save replaces everything.
pub(crate) trait Persistence {
    fn load_months(&self) -> Result<MonthMap>;
    fn save_months(&mut self, months: &MonthMap) -> Result<()>;
}

#[derive(Serialize)]
struct DocumentOut<'a> {
    version: u32,
    months: &'a MonthMap,
}

#[derive(Deserialize)]
struct DocumentIn {
    months: MonthMap,
}

/// Serialize the month map into a versioned JSON document.
pub(crate) fn encode_document(months: &MonthMap) -> Result<String> {
    serde_json::to_string(&DocumentOut {
        version: schema::DOCUMENT_VERSION,
        months,
    })
    .context("Failed to serialize budget data")
}

/// Parse a stored document. Bodies without a `version` field are the bare
/// month map written before the envelope existed.
pub(crate) fn decode_document(body: &str) -> Result<MonthMap> {
    let value: serde_json::Value =
        serde_json::from_str(body).context("Budget data is not valid JSON")?;

    match value.get("version").map(|v| v.as_u64()) {
        Some(Some(v)) if v > u64::from(schema::DOCUMENT_VERSION) => anyhow::bail!(
            "Budget data was written by a newer version (format {v}, supported {})",
            schema::DOCUMENT_VERSION
        ),
        Some(Some(_)) => {
            let doc: DocumentIn =
                serde_json::from_value(value).context("Malformed budget document")?;
            Ok(doc.months)
        }
        Some(None) => anyhow::bail!("Budget document has a non-numeric version"),
        None => {
            tracing::info!("Reading unversioned budget document");
            serde_json::from_value(value).context("Malformed legacy budget document")
        }
    }
}

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        tracing::info!(
            path = %path.display(),
            schema = db.schema_version()?,
            "Opened budget database"
        );
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?
            .unwrap_or(0);

        if current > schema::CURRENT_VERSION {
            anyhow::bail!(
                "Database schema version {current} is newer than supported ({})",
                schema::CURRENT_VERSION
            );
        }

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    pub(crate) fn schema_version(&self) -> Result<i32> {
        Ok(self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })?)
    }

    /// RFC 3339 timestamp of the last successful save, if any.
    pub(crate) fn last_saved(&self) -> Result<Option<String>> {
        Ok(self
            .conn
            .query_row(
                "SELECT updated_at FROM documents WHERE key = ?1",
                params![schema::BUDGET_DOCUMENT_KEY],
                |row| row.get(0),
            )
            .optional()?)
    }
}

impl Persistence for Database {
    fn load_months(&self) -> Result<MonthMap> {
        let body: Option<String> = self
            .conn
            .query_row(
                "SELECT body FROM documents WHERE key = ?1",
                params![schema::BUDGET_DOCUMENT_KEY],
                |row| row.get(0),
            )
            .optional()?;

        match body {
            Some(body) => decode_document(&body),
            None => Ok(MonthMap::new()),
        }
    }

    fn save_months(&mut self, months: &MonthMap) -> Result<()> {
        let body = encode_document(months)?;
        self.conn
            .execute(
                "INSERT INTO documents (key, body, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET body = ?2, updated_at = ?3",
                params![
                    schema::BUDGET_DOCUMENT_KEY,
                    body,
                    chrono::Utc::now().to_rfc3339(),
                ],
            )
            .context("Failed to write budget data")?;
        tracing::debug!(months = months.len(), bytes = body.len(), "Saved budget data");
        Ok(())
    }
}

#[cfg(test)]
mod tests;
