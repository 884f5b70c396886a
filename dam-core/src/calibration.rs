//! Level-keyed calibration curves (level → surface, level → volume).
//!
//! A curve comes from a bathymetric survey and is stored as a plain text
//! table, one `level;quantity` pair per line. See [`crate::loader`] for the
//! accepted formats.

use std::collections::BTreeMap;
use std::path::Path;

use crate::config::BalanceConstants;
use crate::error::{CalibrationError, Result};
use crate::level_key::{Level, LevelKey};
use crate::loader::CalibrationLoader;

/// An immutable lookup from normalized level to a calibrated quantity.
///
/// Keys are [`LevelKey`]s, so a lookup hits regardless of which decimal
/// separator the level was written with. Lookups distinguish an absent level
/// (`None`) from a calibrated zero (`Some(0.0)`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalibrationTable {
    entries: BTreeMap<LevelKey, f64>,
}

impl CalibrationTable {
    /// A table with no entries. Every lookup is absent.
    pub fn empty() -> CalibrationTable {
        CalibrationTable::default()
    }

    /// Build a table from calibration text with the default loader.
    pub fn load(text: &str) -> CalibrationTable {
        CalibrationLoader::default().load(text).0
    }

    /// Read and load a calibration file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<CalibrationTable> {
        CalibrationTable::from_path_with(&CalibrationLoader::default(), path)
    }

    pub fn from_path_with<P: AsRef<Path>>(
        loader: &CalibrationLoader,
        path: P,
    ) -> Result<CalibrationTable> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CalibrationError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(loader.load(&text).0)
    }

    pub(crate) fn from_entries(entries: BTreeMap<LevelKey, f64>) -> CalibrationTable {
        CalibrationTable { entries }
    }

    /// Quantity calibrated for `level`, or `None` when the level is not in
    /// the table (or cannot be normalized at all).
    pub fn lookup<L: Level + ?Sized>(&self, level: &L) -> Option<f64> {
        level
            .level_key()
            .and_then(|key| self.entries.get(&key).copied())
    }

    /// Same as [`lookup`](Self::lookup) with absent collapsed to 0.
    pub fn lookup_or_zero<L: Level + ?Sized>(&self, level: &L) -> f64 {
        self.lookup(level).unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lowest and highest calibrated levels.
    pub fn coverage(&self) -> Option<(LevelKey, LevelKey)> {
        let first = self.entries.keys().next()?;
        let last = self.entries.keys().next_back()?;
        Some((*first, *last))
    }

    /// Entries in ascending level order.
    pub fn iter(&self) -> impl Iterator<Item = (LevelKey, f64)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, *v))
    }
}

impl FromIterator<(LevelKey, f64)> for CalibrationTable {
    /// Later pairs overwrite earlier ones with the same key.
    fn from_iter<I: IntoIterator<Item = (LevelKey, f64)>>(iter: I) -> Self {
        CalibrationTable {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Everything the metrics engine needs besides the readings themselves:
/// both calibration curves and the reservoir's balance constants.
///
/// Built once by the host and passed by reference; there is no global
/// calibration state. An empty context (no curves loaded) is valid and makes
/// every surface and volume read as 0.
#[derive(Debug, Clone, Default)]
pub struct CalibrationContext {
    pub surface: CalibrationTable,
    pub volume: CalibrationTable,
    pub constants: BalanceConstants,
}

impl CalibrationContext {
    pub fn new(surface: CalibrationTable, volume: CalibrationTable) -> CalibrationContext {
        CalibrationContext {
            surface,
            volume,
            constants: BalanceConstants::default(),
        }
    }

    /// A context with no curves loaded.
    pub fn empty() -> CalibrationContext {
        CalibrationContext::default()
    }

    pub fn with_constants(mut self, constants: BalanceConstants) -> CalibrationContext {
        self.constants = constants;
        self
    }

    /// Load both curves from files.
    pub fn from_paths<P: AsRef<Path>, Q: AsRef<Path>>(
        surface_path: P,
        volume_path: Q,
    ) -> Result<CalibrationContext> {
        CalibrationContext::from_paths_with(
            &CalibrationLoader::default(),
            surface_path,
            volume_path,
        )
    }

    pub fn from_paths_with<P: AsRef<Path>, Q: AsRef<Path>>(
        loader: &CalibrationLoader,
        surface_path: P,
        volume_path: Q,
    ) -> Result<CalibrationContext> {
        let surface = CalibrationTable::from_path_with(loader, surface_path)?;
        let volume = CalibrationTable::from_path_with(loader, volume_path)?;
        log::info!(
            "calibration: surface curve has {} levels, volume curve has {} levels",
            surface.len(),
            volume.len()
        );
        Ok(CalibrationContext::new(surface, volume))
    }

    /// True once both curves hold at least one level.
    pub fn is_loaded(&self) -> bool {
        !self.surface.is_empty() && !self.volume.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn key(text: &str) -> LevelKey {
        LevelKey::parse(text).unwrap()
    }

    #[test]
    fn test_lookup_hits_either_separator() {
        let table: CalibrationTable = vec![(key("105.00"), 300.75)].into_iter().collect();
        assert_eq!(table.lookup("105,00"), Some(300.75));
        assert_eq!(table.lookup("105.00"), Some(300.75));
        assert_eq!(table.lookup(&105.0), Some(300.75));
        assert_eq!(table.lookup("105.001"), Some(300.75));
    }

    #[test]
    fn test_half_level_keys_round_up() {
        let table = CalibrationTable::load("104.125;1\n104,375;2\n");
        assert_eq!(table.lookup("104.13"), Some(1.0));
        assert_eq!(table.lookup("104.12"), None);
        assert_eq!(table.lookup("104,38"), Some(2.0));
    }

    #[test]
    fn test_absent_is_distinct_from_zero() {
        let table: CalibrationTable = vec![(key("100"), 0.0)].into_iter().collect();
        assert_eq!(table.lookup("100"), Some(0.0));
        assert_eq!(table.lookup("999.99"), None);
        assert_eq!(table.lookup(""), None);
        assert_eq!(table.lookup_or_zero("999.99"), 0.0);
    }

    #[test]
    fn test_last_write_wins() {
        let table: CalibrationTable = vec![(key("105"), 1.0), (key("105,00"), 2.0)]
            .into_iter()
            .collect();
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup("105"), Some(2.0));
    }

    #[test]
    fn test_coverage() {
        assert_eq!(CalibrationTable::empty().coverage(), None);
        let table: CalibrationTable = vec![
            (key("104"), 290.0),
            (key("101.5"), 250.0),
            (key("105"), 300.75),
        ]
        .into_iter()
        .collect();
        let (low, high) = table.coverage().unwrap();
        assert_eq!(low.to_string(), "101.50");
        assert_eq!(high.to_string(), "105.00");
    }

    #[test]
    fn test_context_from_paths() {
        let mut surface = tempfile::NamedTempFile::new().unwrap();
        writeln!(surface, "105,00;1200,5").unwrap();
        let mut volume = tempfile::NamedTempFile::new().unwrap();
        writeln!(volume, "105.00;300.750\n104.00;290.0").unwrap();

        let context = CalibrationContext::from_paths(surface.path(), volume.path()).unwrap();
        assert!(context.is_loaded());
        assert_eq!(context.surface.lookup("105"), Some(1200.5));
        assert_eq!(context.volume.lookup("104"), Some(290.0));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = CalibrationTable::from_path("/nonexistent/surface.csv");
        assert!(matches!(result, Err(CalibrationError::Io { .. })));
    }

    #[test]
    fn test_empty_context_is_not_loaded() {
        assert!(!CalibrationContext::empty().is_loaded());
    }
}
