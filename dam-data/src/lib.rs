//! Daily water balance for the reservoir logbook.
//!
//! This crate turns raw readings into [`metrics::DailyMetrics`] and folds
//! them into period totals:
//!
//! ```rust
//! use chrono::NaiveDate;
//! use dam_core::{CalibrationContext, CalibrationTable, Field, RawReading};
//! use dam_data::metrics::derive;
//!
//! let context = CalibrationContext::new(
//!     CalibrationTable::load("105,00;1200,5\n"),
//!     CalibrationTable::load("105,00;300,750\n104,00;290,0\n"),
//! );
//! let yesterday = RawReading::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
//!     .with(Field::Cote, "104");
//! let today = RawReading::new(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap())
//!     .with(Field::Cote, "105");
//!
//! let metrics = derive(&today, Some(&yesterday), &context);
//! assert!((metrics.gains - 10.75).abs() < 1e-9);
//! ```
//!
//! Hosts normally go through [`logbook::Logbook`], which resolves the
//! previous day against the full record store.

pub mod aggregate;
pub mod export;
pub mod index;
pub mod logbook;
pub mod metrics;
pub mod view;

pub use aggregate::{aggregate, AggregateError, AggregateMetrics, BalanceTotals};
pub use index::RecordIndex;
pub use logbook::{Logbook, LogbookError};
pub use metrics::{derive, DailyMetrics};
pub use view::{Page, ViewFilter};
