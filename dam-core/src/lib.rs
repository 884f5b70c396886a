//! Core types for the reservoir operations logbook.
//!
//! - [`reading::RawReading`]: one day's operator input
//! - [`calibration::CalibrationTable`]: level → surface / volume curves,
//!   keyed by [`level_key::LevelKey`]
//! - [`loader::CalibrationLoader`]: parses survey text into a table
//! - [`calibration::CalibrationContext`]: both curves plus balance constants,
//!   handed to the metrics engine in `dam-data`
//! - [`store::RecordStore`]: persistence seam implemented in `dam-db`

pub mod calibration;
pub mod config;
pub mod error;
pub mod level_key;
pub mod loader;
pub mod reading;
pub mod store;

pub use calibration::{CalibrationContext, CalibrationTable};
pub use config::{BalanceConstants, ReservoirConfig};
pub use level_key::LevelKey;
pub use reading::{Field, RawReading};
pub use store::RecordStore;
