//! Typed queries over the `readings` table.
//!
//! Dates are stored as ISO text, so lexical order is date order and range
//! filters can be done in SQL.

use crate::Database;
use chrono::{Months, NaiveDate};
use dam_core::RawReading;
use dam_utils::dates::{format_date, YearMonth, ISO_FORMAT};
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row};

const SELECT_READINGS: &str =
    "SELECT date, cote, vdf, dvr, fuites, transfert, pluie, lecture_bac FROM readings";

fn row_to_reading(row: &Row<'_>) -> rusqlite::Result<RawReading> {
    let date_text: String = row.get(0)?;
    let date = NaiveDate::parse_from_str(&date_text, ISO_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;
    Ok(RawReading {
        date,
        cote: row.get(1)?,
        vdf: row.get(2)?,
        dvr: row.get(3)?,
        fuites: row.get(4)?,
        transfert: row.get(5)?,
        pluie: row.get(6)?,
        lecture_bac: row.get(7)?,
    })
}

impl Database {
    /// Every reading, oldest first.
    pub fn query_all_readings(&self) -> anyhow::Result<Vec<RawReading>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(&format!("{} ORDER BY date", SELECT_READINGS))?;
        let rows = stmt
            .query_map([], row_to_reading)?
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!("db: query_all_readings returned {} records", rows.len());
        Ok(rows)
    }

    /// The reading for one day.
    pub fn query_reading(&self, date: &NaiveDate) -> anyhow::Result<Option<RawReading>> {
        let conn = self.conn.borrow();
        let reading = conn
            .query_row(
                &format!("{} WHERE date = ?1", SELECT_READINGS),
                params![format_date(date)],
                row_to_reading,
            )
            .optional()?;
        Ok(reading)
    }

    /// Readings between two dates (inclusive), oldest first.
    pub fn query_readings_between(
        &self,
        start: &NaiveDate,
        end: &NaiveDate,
    ) -> anyhow::Result<Vec<RawReading>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(&format!(
            "{} WHERE date >= ?1 AND date <= ?2 ORDER BY date",
            SELECT_READINGS
        ))?;
        let rows = stmt
            .query_map(params![format_date(start), format_date(end)], row_to_reading)?
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!(
            "db: query_readings_between {} and {} returned {} records",
            start,
            end,
            rows.len()
        );
        Ok(rows)
    }

    /// Readings of one calendar month, oldest first.
    pub fn query_month(&self, month: &YearMonth) -> anyhow::Result<Vec<RawReading>> {
        let start = NaiveDate::from_ymd_opt(month.year, month.month, 1)
            .ok_or_else(|| anyhow::anyhow!("invalid month {:?}", month))?;
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX);
        self.query_readings_between(&start, &end)
    }

    pub fn count_readings(&self) -> anyhow::Result<usize> {
        let conn = self.conn.borrow();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM readings", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use crate::Database;
    use chrono::NaiveDate;
    use dam_core::{Field, RawReading, RecordStore};
    use dam_utils::dates::YearMonth;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn seeded() -> Database {
        let db = Database::new().unwrap();
        db.save_records(&[
            RawReading::new(date(3, 2)).with(Field::Cote, "105"),
            RawReading::new(date(2, 29)).with(Field::Cote, "103,5"),
            RawReading::new(date(3, 1)).with(Field::Cote, "104"),
            RawReading::new(date(4, 1)).with(Field::Cote, "106"),
        ])
        .unwrap();
        db
    }

    #[test]
    fn query_all_is_ordered() {
        let db = seeded();
        let dates: Vec<NaiveDate> = db
            .query_all_readings()
            .unwrap()
            .iter()
            .map(|r| r.date)
            .collect();
        assert_eq!(dates, vec![date(2, 29), date(3, 1), date(3, 2), date(4, 1)]);
    }

    #[test]
    fn query_single_reading() {
        let db = seeded();
        let reading = db.query_reading(&date(2, 29)).unwrap().unwrap();
        assert_eq!(reading.cote, "103,5");
        assert!(db.query_reading(&date(5, 1)).unwrap().is_none());
    }

    #[test]
    fn query_between_is_inclusive() {
        let db = seeded();
        let rows = db.query_readings_between(&date(3, 1), &date(4, 1)).unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn query_month_bounds() {
        let db = seeded();
        let march = db.query_month(&YearMonth::parse("2024-03").unwrap()).unwrap();
        assert_eq!(march.len(), 2);
        let february = db.query_month(&YearMonth::parse("2024-02").unwrap()).unwrap();
        assert_eq!(february.len(), 1);
        assert_eq!(db.count_readings().unwrap(), 4);
    }
}
