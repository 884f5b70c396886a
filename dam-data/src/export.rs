//! Spreadsheet export of derived rows.
//!
//! Columns and precisions match the on-screen table: level to 2 decimals,
//! volumes to 3, rainfall and pan reading to 1, fill rate to 2.

use dam_utils::dates::format_date_fr;
use dam_utils::numbers::format_fixed;
use std::io::Write;

use crate::metrics::DailyMetrics;

pub const EXPORT_HEADERS: [&str; 15] = [
    "Date",
    "Cote (m)",
    "Surface (ha)",
    "Volume (Hm³)",
    "Gains (Hm³)",
    "Évaporation (Hm³)",
    "VDF (Hm³)",
    "DVR (Hm³)",
    "Fuites (Hm³)",
    "Transfert (Hm³)",
    "Affluent (Hm³)",
    "Défluent (Hm³)",
    "Pluie (mm)",
    "Lecture Bac (mm)",
    "Taux (%)",
];

/// Render one row the way it is displayed.
pub fn format_row(day: &DailyMetrics) -> [String; 15] {
    [
        format_date_fr(&day.date),
        format_fixed(day.cote, 2),
        format_fixed(day.surface, 3),
        format_fixed(day.volume, 3),
        format_fixed(day.gains, 3),
        format_fixed(day.evaporation, 3),
        format_fixed(day.vdf, 3),
        format_fixed(day.dvr, 3),
        format_fixed(day.fuites, 3),
        format_fixed(day.transfert, 3),
        format_fixed(day.affluent, 3),
        format_fixed(day.defluent, 3),
        format_fixed(day.pluie, 1),
        format_fixed(day.lecture_bac, 1),
        format_fixed(day.taux, 2),
    ]
}

/// Write `rows` as CSV with a header line.
pub fn write_csv<W: Write>(rows: &[DailyMetrics], writer: W) -> anyhow::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(EXPORT_HEADERS)?;
    for row in rows {
        wtr.write_record(format_row(row))?;
    }
    wtr.flush()?;
    log::info!("export: wrote {} rows", rows.len());
    Ok(())
}

pub fn to_csv_string(rows: &[DailyMetrics]) -> anyhow::Result<String> {
    let mut buffer = Vec::new();
    write_csv(rows, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// File name for an export made on `date`.
pub fn export_file_name(date: &chrono::NaiveDate) -> String {
    format!("barrage_data_{}.csv", dam_utils::dates::format_date(date))
}
