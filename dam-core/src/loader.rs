//! Calibration text parsing.
//!
//! # Format
//!
//! One `level<delim>quantity` pair per line, where `<delim>` is `;` when the
//! line contains one and `,` otherwise. Either number may use a comma as the
//! decimal separator (only unambiguous with the `;` delimiter):
//!
//! ```text
//! Cote;Volume
//! 104,00;290,0
//! 105.00;300.750
//! 105.50,305.1
//! ```
//!
//! Lines that do not yield two numbers (headers, notes, blank lines) are
//! skipped. Each number must be the whole field: a trailing unit such as
//! `105,00;300,75 Hm3` makes the line unparseable and it is skipped, not
//! read as its numeric prefix. A level that appears twice keeps its last
//! quantity.
//!
//! Survey files run to tens of thousands of lines, so the loader works in
//! batches. [`CalibrationLoader::load_async`] yields to the runtime between
//! batches; the resulting table is identical to [`CalibrationLoader::load`].

use std::collections::BTreeMap;

use dam_utils::numbers::parse_decimal;
use log::{debug, info};

use crate::calibration::CalibrationTable;
use crate::config::ReservoirConfig;
use crate::level_key::LevelKey;

/// Lines per batch when no size is configured.
pub const DEFAULT_BATCH_SIZE: usize = 10_000;

/// Counters collected while loading a calibration text.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    /// Non-blank lines seen
    pub lines: usize,
    /// Lines that produced an entry
    pub accepted: usize,
    /// Accepted lines that replaced an earlier entry for the same level
    pub overwritten: usize,
    /// Non-blank lines that were not two numbers
    pub skipped: usize,
    /// Batches processed
    pub batches: usize,
}

/// Parse one calibration line into a normalized level and its quantity.
///
/// `None` for blank lines and for anything that is not two decimals.
pub fn parse_line(line: &str) -> Option<(LevelKey, f64)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let delimiter = if line.contains(';') { ';' } else { ',' };
    let mut fields = line.split(delimiter);
    let level = parse_decimal(fields.next()?)?;
    let quantity = parse_decimal(fields.next()?)?;
    Some((LevelKey::from_level(level)?, quantity))
}

/// Split on `\n`, `\r\n` or a lone `\r`.
fn split_lines(text: &str) -> Vec<&str> {
    text.split(['\n', '\r']).collect()
}

/// Batched calibration loader.
#[derive(Debug, Clone, Copy)]
pub struct CalibrationLoader {
    batch_size: usize,
}

impl Default for CalibrationLoader {
    fn default() -> Self {
        CalibrationLoader::new(DEFAULT_BATCH_SIZE)
    }
}

impl CalibrationLoader {
    /// A zero batch size is treated as 1.
    pub fn new(batch_size: usize) -> CalibrationLoader {
        CalibrationLoader {
            batch_size: batch_size.max(1),
        }
    }

    /// A loader using the configured batch size.
    pub fn for_config(config: &ReservoirConfig) -> CalibrationLoader {
        CalibrationLoader::new(config.loader_batch_size)
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn ingest_batch(
        entries: &mut BTreeMap<LevelKey, f64>,
        report: &mut LoadReport,
        batch: &[&str],
    ) {
        for line in batch {
            if line.trim().is_empty() {
                continue;
            }
            report.lines += 1;
            match parse_line(line) {
                Some((key, quantity)) => {
                    report.accepted += 1;
                    if entries.insert(key, quantity).is_some() {
                        report.overwritten += 1;
                    }
                }
                None => {
                    report.skipped += 1;
                    debug!("calibration: skipping line {:?}", line);
                }
            }
        }
        report.batches += 1;
    }

    fn finish(
        entries: BTreeMap<LevelKey, f64>,
        report: LoadReport,
    ) -> (CalibrationTable, LoadReport) {
        info!(
            "calibration: loaded {} levels from {} lines, skipped {}",
            entries.len(),
            report.lines,
            report.skipped
        );
        (CalibrationTable::from_entries(entries), report)
    }

    /// Build a table in one go.
    pub fn load(&self, text: &str) -> (CalibrationTable, LoadReport) {
        let lines = split_lines(text);
        let mut entries = BTreeMap::new();
        let mut report = LoadReport::default();
        for batch in lines.chunks(self.batch_size) {
            Self::ingest_batch(&mut entries, &mut report, batch);
        }
        Self::finish(entries, report)
    }

    /// Build a table, yielding to the tokio runtime after every batch so a
    /// latency-sensitive task sharing the thread keeps running.
    #[cfg(feature = "async")]
    pub async fn load_async(&self, text: &str) -> (CalibrationTable, LoadReport) {
        let lines = split_lines(text);
        let mut entries = BTreeMap::new();
        let mut report = LoadReport::default();
        for batch in lines.chunks(self.batch_size) {
            Self::ingest_batch(&mut entries, &mut report, batch);
            tokio::task::yield_now().await;
        }
        Self::finish(entries, report)
    }
}
