//! SQL schema for the readings database.
//!
//! Numeric fields are stored as the operator typed them (TEXT), so a reading
//! read back from the database is identical to the one saved.

/// Returns the full SQL schema as a single batch string.
///
/// - `readings` - one row per calendar day, keyed by ISO date (YYYY-MM-DD)
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS readings (
        date TEXT PRIMARY KEY,
        cote TEXT NOT NULL DEFAULT '0',
        vdf TEXT NOT NULL DEFAULT '0',
        dvr TEXT NOT NULL DEFAULT '0',
        fuites TEXT NOT NULL DEFAULT '0',
        transfert TEXT NOT NULL DEFAULT '0',
        pluie TEXT NOT NULL DEFAULT '0',
        lecture_bac TEXT NOT NULL DEFAULT '0'
    );
    "#
}
