//! JSON import and export for the `readings` table.
//!
//! The format is the backup file the logbook exports: a JSON array of
//! readings, each with an ISO `date` and text fields in camelCase
//! (`lectureBac`). Fields may be strings, numbers or null.
//!
//! ```text
//! [{"date":"2024-03-01","cote":"104,00","vdf":"1.2","lectureBac":8}]
//! ```

use crate::{upsert_row, Database};
use dam_core::RawReading;

impl Database {
    /// Merge readings from a JSON array into the table.
    ///
    /// Readings replace any stored reading with the same date. Returns the
    /// number of readings loaded.
    pub fn load_readings_json(&self, json: &str) -> anyhow::Result<usize> {
        let readings: Vec<RawReading> = serde_json::from_str(json)?;
        let conn = self.conn.borrow();
        let tx = conn.unchecked_transaction()?;
        for mut reading in readings.iter().cloned() {
            reading.fill_blanks();
            upsert_row(&tx, &reading)?;
        }
        tx.commit()?;
        log::info!("db: loaded {} readings from JSON", readings.len());
        Ok(readings.len())
    }

    /// Every reading as a pretty-printed JSON array, oldest first.
    pub fn export_readings_json(&self) -> anyhow::Result<String> {
        let readings = self.query_all_readings()?;
        Ok(serde_json::to_string_pretty(&readings)?)
    }
}
