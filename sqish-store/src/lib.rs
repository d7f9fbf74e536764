//! History storage for sqish.
//!
//! - [`HistoryStore`] - the contract the search engine consumes
//! - [`Db`] - shared SQLite connection with schema setup
//! - [`SqliteStore`] - [`HistoryStore`] backed by [`Db`]

mod db;
mod sqlite;


use anyhow::Result;
use sqish_types::{Query, Record, Settings};

pub use crate::db::Db;
pub use crate::sqlite::SqliteStore;

/// Durable command history plus the persisted search toggles.
pub trait HistoryStore {
    /// Records matching `query`, in display order.
    fn query(&self, query: &Query) -> Result<Vec<Record>>;

    /// Append a record.
    fn add(&self, record: &Record) -> Result<()>;

    /// Stored toggles, or the defaults when nothing was saved yet.
    fn load_settings(&self) -> Result<Settings>;

    fn save_settings(&self, settings: &Settings) -> Result<()>;
}
