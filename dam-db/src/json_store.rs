//! Readings kept as one JSON array on disk.

use dam_core::{RawReading, RecordStore};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Name the logbook's backup export uses.
pub const DATA_FILE_NAME: &str = "barrage-home-data.json";

/// File-backed [`RecordStore`].
///
/// A missing file reads as an empty logbook. Saves write a sibling temporary
/// file and rename it over the target, so readers see either the old or the
/// new array.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    pretty: bool,
}

impl JsonFileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> JsonFileStore {
        JsonFileStore {
            path: path.into(),
            pretty: true,
        }
    }

    /// `DATA_FILE_NAME` inside `dir`.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> JsonFileStore {
        JsonFileStore::new(dir.as_ref().join(DATA_FILE_NAME))
    }

    /// Write compact JSON instead of pretty-printed.
    pub fn compact(mut self) -> JsonFileStore {
        self.pretty = false;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| DATA_FILE_NAME.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl RecordStore for JsonFileStore {
    fn get_records(&self) -> anyhow::Result<Vec<RawReading>> {
        if !self.path.exists() {
            log::debug!("json store: {} not found, starting empty", self.path.display());
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&self.path)?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let records: Vec<RawReading> = serde_json::from_str(&text)
            .map_err(|e| anyhow::anyhow!("{}: {}", self.path.display(), e))?;
        log::debug!(
            "json store: read {} readings from {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }

    fn save_records(&self, records: &[RawReading]) -> anyhow::Result<()> {
        let json = if self.pretty {
            serde_json::to_string_pretty(records)?
        } else {
            serde_json::to_string(records)?
        };
        let temp = self.temp_path();
        {
            let mut file = fs::File::create(&temp)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&temp, &self.path)?;
        log::info!(
            "json store: saved {} readings to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }
}
