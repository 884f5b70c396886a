//! Reservoir configuration.
//!
//! Every field has a default matching the Beni Haroun dam, so an empty JSON
//! object (or no file at all) gives the standard logbook behavior.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::loader::DEFAULT_BATCH_SIZE;

/// Maximum storage capacity used for the fill rate (Hm³).
pub const MAX_CAPACITY_HM3: f64 = 880.139;

/// Pan-to-lake evaporation coefficient.
pub const PAN_COEFFICIENT: f64 = 0.78;

/// Rows per page in the logbook table.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Constants of the daily water balance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConstants {
    /// Capacity the fill rate is expressed against (Hm³)
    pub max_capacity_hm3: f64,
    /// Evaporation pan coefficient
    pub pan_coefficient: f64,
}

impl Default for BalanceConstants {
    fn default() -> Self {
        BalanceConstants {
            max_capacity_hm3: MAX_CAPACITY_HM3,
            pan_coefficient: PAN_COEFFICIENT,
        }
    }
}

/// Logbook configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservoirConfig {
    /// Name printed on reports
    pub name: String,
    #[serde(flatten)]
    pub balance: BalanceConstants,
    /// Calibration lines processed between cooperative yields
    pub loader_batch_size: usize,
    /// Rows per page in the logbook table
    pub page_size: usize,
}

impl Default for ReservoirConfig {
    fn default() -> Self {
        ReservoirConfig {
            name: "Barrage Beni Haroun".to_string(),
            balance: BalanceConstants::default(),
            loader_batch_size: DEFAULT_BATCH_SIZE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ReservoirConfig {
    pub fn from_json_str(json: &str) -> anyhow::Result<ReservoirConfig> {
        let config: ReservoirConfig = serde_json::from_str(json)?;
        config.check()?;
        Ok(config)
    }

    /// Load a JSON config file. A missing file yields the defaults.
    pub fn from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<ReservoirConfig> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("config: {} not found, using defaults", path.display());
            return Ok(ReservoirConfig::default());
        }
        let json = std::fs::read_to_string(path)?;
        ReservoirConfig::from_json_str(&json)
    }

    fn check(&self) -> anyhow::Result<()> {
        if !(self.balance.max_capacity_hm3.is_finite() && self.balance.max_capacity_hm3 > 0.0) {
            anyhow::bail!(
                "max_capacity_hm3 must be a positive number, got {}",
                self.balance.max_capacity_hm3
            );
        }
        if self.page_size == 0 {
            anyhow::bail!("page_size must be at least 1");
        }
        Ok(())
    }
}
