//! Record stores for the reservoir logbook.
//!
//! Two implementations of [`dam_core::RecordStore`]:
//!
//! - [`Database`]: SQLite, in memory or in a file, with typed date queries
//! - [`json_store::JsonFileStore`]: a single JSON array on disk, the format
//!   the logbook has always exported (`barrage-home-data.json`)
//!
//! # Usage
//!
//! ```rust
//! use dam_core::RecordStore;
//! use dam_db::Database;
//!
//! let db = Database::new().unwrap();
//! db.load_readings_json(r#"[{"date":"2024-03-01","cote":"104"}]"#).unwrap();
//! let records = db.get_records().unwrap();
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].vdf, "0");
//! ```

pub mod json_store;
mod loader;
mod queries;
pub mod schema;

use dam_core::{RawReading, RecordStore};
use dam_utils::dates::format_date;
use rusqlite::{params, Connection};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

pub use json_store::JsonFileStore;

/// SQLite-backed reading store.
///
/// This struct is cheaply cloneable (via `Rc`); clones share one connection.
#[derive(Clone)]
pub struct Database {
    conn: Rc<RefCell<Connection>>,
}

impl Database {
    /// Create a new in-memory database with the schema applied.
    pub fn new() -> anyhow::Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Open (or create) a database file.
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    fn from_connection(conn: Connection) -> anyhow::Result<Self> {
        conn.execute_batch(schema::create_schema())?;
        Ok(Self {
            conn: Rc::new(RefCell::new(conn)),
        })
    }
}

/// Insert or replace a single reading.
fn upsert_row(conn: &Connection, r: &RawReading) -> rusqlite::Result<usize> {
    conn.execute(
        "INSERT OR REPLACE INTO readings
         (date, cote, vdf, dvr, fuites, transfert, pluie, lecture_bac)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            format_date(&r.date),
            r.cote,
            r.vdf,
            r.dvr,
            r.fuites,
            r.transfert,
            r.pluie,
            r.lecture_bac
        ],
    )
}

impl RecordStore for Database {
    fn get_records(&self) -> anyhow::Result<Vec<RawReading>> {
        self.query_all_readings()
    }

    /// Replace the whole table in one transaction.
    fn save_records(&self, records: &[RawReading]) -> anyhow::Result<()> {
        let conn = self.conn.borrow();
        let tx = conn.unchecked_transaction()?;
        tx.execute("DELETE FROM readings", [])?;
        for record in records {
            upsert_row(&tx, record)?;
        }
        tx.commit()?;
        log::info!("db: saved {} readings", records.len());
        Ok(())
    }
}
