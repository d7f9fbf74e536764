//! SQLite-backed [`HistoryStore`].

use crate::HistoryStore;
use crate::db::Db;
use anyhow::{Context, Result};
use chrono::DateTime;
use rusqlite::types::ToSql;
use rusqlite::{OptionalExtension, Row};
use sqish_types::{Query, Record, Settings};
use std::path::Path;
use tracing::debug;

/// Grouped rows span hosts and sessions, so those columns are left blank.
const SELECT_BY_FREQUENCY: &str = "SELECT command, directory, '' AS hostname, '' AS session_id,
        MAX(timestamp) AS last_used, COUNT(*) AS uses
     FROM records";
const SELECT_BY_TIME: &str =
    "SELECT command, directory, hostname, session_id, timestamp FROM records";

#[derive(Clone, Debug)]
pub struct SqliteStore {
    db: Db,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(SqliteStore { db: Db::new(path)? })
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(SqliteStore {
            db: Db::open_in_memory()?,
        })
    }
}

/// Render `query` as SQL plus its positional parameters.
pub(crate) fn build_sql(query: &Query) -> (String, Vec<Box<dyn ToSql>>) {
    // instr() is case-sensitive and treats % and _ literally, unlike LIKE.
    let mut sql = String::from(if query.sort_by_frequency {
        SELECT_BY_FREQUENCY
    } else {
        SELECT_BY_TIME
    });
    sql.push_str(" WHERE instr(command, ?) > 0");
    let mut params: Vec<Box<dyn ToSql>> = vec![Box::new(query.text.clone())];

    if let Some(directory) = &query.directory {
        sql.push_str(" AND directory = ?");
        params.push(Box::new(directory.clone()));
    }
    if let Some(hostname) = &query.hostname {
        sql.push_str(" AND hostname = ?");
        params.push(Box::new(hostname.clone()));
    }
    if let Some(session_id) = &query.session_id {
        sql.push_str(" AND session_id = ?");
        params.push(Box::new(session_id.clone()));
    }

    if query.sort_by_frequency {
        sql.push_str(" GROUP BY command, directory ORDER BY uses DESC, last_used DESC");
    } else {
        sql.push_str(" ORDER BY timestamp DESC, id DESC");
    }

    // A negative LIMIT means no limit in SQLite.
    sql.push_str(" LIMIT ?");
    let limit = query.limit.map_or(-1, |limit| limit as i64);
    params.push(Box::new(limit));

    (sql, params)
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<Record> {
    let millis: i64 = row.get(4)?;
    Ok(Record {
        command: row.get(0)?,
        directory: row.get(1)?,
        hostname: row.get(2)?,
        session_id: row.get(3)?,
        timestamp: DateTime::from_timestamp_millis(millis).unwrap_or_default(),
    })
}

impl HistoryStore for SqliteStore {
    fn query(&self, query: &Query) -> Result<Vec<Record>> {
        let (sql, params) = build_sql(query);
        let params_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let conn = self.db.get_connection();
        let mut stmt = conn.prepare_cached(&sql).context("failed to prepare history query")?;
        let rows = stmt.query_map(params_refs.as_slice(), record_from_row)?;
        let records = rows
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("failed to read history rows")?;

        debug!("query {:?} returned {} records", query.text, records.len());
        Ok(records)
    }

    fn add(&self, record: &Record) -> Result<()> {
        let conn = self.db.get_connection();
        conn.execute(
            "INSERT INTO records (command, directory, hostname, session_id, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                record.command,
                record.directory,
                record.hostname,
                record.session_id,
                record.timestamp.timestamp_millis()
            ],
        )
        .context("failed to add history record")?;
        Ok(())
    }

    fn load_settings(&self) -> Result<Settings> {
        let conn = self.db.get_connection();
        let settings = conn
            .query_row(
                "SELECT sort_by_frequency, restrict_to_session, restrict_to_cwd
                 FROM settings WHERE id = 1",
                [],
                |row| {
                    Ok(Settings {
                        sort_by_frequency: row.get(0)?,
                        restrict_to_session: row.get(1)?,
                        restrict_to_cwd: row.get(2)?,
                    })
                },
            )
            .optional()
            .context("failed to load settings")?;
        Ok(settings.unwrap_or_default())
    }

    fn save_settings(&self, settings: &Settings) -> Result<()> {
        let conn = self.db.get_connection();
        conn.execute(
            "INSERT INTO settings (id, sort_by_frequency, restrict_to_session, restrict_to_cwd)
             VALUES (1, ?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET
                 sort_by_frequency = excluded.sort_by_frequency,
                 restrict_to_session = excluded.restrict_to_session,
                 restrict_to_cwd = excluded.restrict_to_cwd",
            rusqlite::params![
                settings.sort_by_frequency,
                settings.restrict_to_session,
                settings.restrict_to_cwd
            ],
        )
        .context("failed to save settings")?;
        Ok(())
    }
}
