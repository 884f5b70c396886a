//! The logbook facade used by the table, print, export and share surfaces.
//!
//! A [`Logbook`] owns the calibration context and talks to a
//! [`RecordStore`]. Every query takes a fresh snapshot of the store, indexes
//! it by date and derives rows against that snapshot, so a row's metrics
//! never depend on which filter or page it is shown in.

use chrono::NaiveDate;
use dam_core::error::{CalibrationError, ReadingError};
use dam_core::loader::CalibrationLoader;
use dam_core::{CalibrationContext, RawReading, RecordStore, ReservoirConfig};
use std::path::Path;
use thiserror::Error;

use crate::aggregate::{aggregate, AggregateError, AggregateMetrics};
use crate::index::RecordIndex;
use crate::metrics::DailyMetrics;
use crate::view::{paginate, Page, ViewFilter};

#[derive(Error, Debug)]
pub enum LogbookError {
    #[error("no reading recorded for {0}")]
    RecordNotFound(NaiveDate),

    #[error("invalid reading: {0}")]
    InvalidReading(#[from] ReadingError),

    #[error(transparent)]
    Calibration(#[from] CalibrationError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, LogbookError>;

/// Whether an upsert created a new day or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Added,
    Updated,
}

/// Rows selected for a report together with their totals and means.
#[derive(Debug, Clone)]
pub struct PeriodSummary {
    /// Oldest first
    pub rows: Vec<DailyMetrics>,
    pub aggregate: AggregateMetrics,
}

pub struct Logbook<S: RecordStore> {
    store: S,
    context: CalibrationContext,
    config: ReservoirConfig,
}

impl<S: RecordStore> Logbook<S> {
    pub fn new(store: S, context: CalibrationContext) -> Logbook<S> {
        Logbook::with_config(store, context, ReservoirConfig::default())
    }

    /// The balance constants of `config` replace those of `context`.
    pub fn with_config(
        store: S,
        context: CalibrationContext,
        config: ReservoirConfig,
    ) -> Logbook<S> {
        let context = context.with_constants(config.balance);
        Logbook {
            store,
            context,
            config,
        }
    }

    pub fn context(&self) -> &CalibrationContext {
        &self.context
    }

    pub fn config(&self) -> &ReservoirConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Swap in freshly loaded calibration curves, keeping the constants.
    pub fn set_calibration(&mut self, context: CalibrationContext) {
        self.context = context.with_constants(self.config.balance);
    }

    /// Load both calibration curves from files with the configured batch
    /// size. On error the current curves are kept.
    pub fn load_calibration<P: AsRef<Path>, Q: AsRef<Path>>(
        &mut self,
        surface_path: P,
        volume_path: Q,
    ) -> Result<()> {
        let loader = CalibrationLoader::for_config(&self.config);
        let context = CalibrationContext::from_paths_with(&loader, surface_path, volume_path)?;
        log::info!(
            "logbook: {} calibrated over levels {:?}",
            self.config.name,
            context.volume.coverage()
        );
        self.set_calibration(context);
        Ok(())
    }

    /// Snapshot the store into a date index.
    pub fn snapshot(&self) -> Result<RecordIndex> {
        Ok(RecordIndex::new(self.store.get_records()?))
    }

    /// Metrics for the reading on `date`, with gains resolved against the
    /// whole store.
    pub fn derive_for_record(&self, date: NaiveDate) -> Result<DailyMetrics> {
        self.snapshot()?
            .derive_for(&date, &self.context)
            .ok_or(LogbookError::RecordNotFound(date))
    }

    /// Metrics for every reading matching `filter`, oldest first.
    pub fn derive_view(&self, filter: &ViewFilter) -> Result<Vec<DailyMetrics>> {
        let index = self.snapshot()?;
        let selected = filter.select(index.readings());
        Ok(index.derive_all(selected, &self.context))
    }

    /// One page of the logbook table, newest first.
    pub fn page(&self, filter: &ViewFilter, page: usize) -> Result<Page<DailyMetrics>> {
        let index = self.snapshot()?;
        let mut selected = filter.select(index.readings());
        selected.reverse();
        let page = paginate(selected, page, self.config.page_size);
        Ok(Page {
            items: index.derive_all(page.items, &self.context),
            page: page.page,
            total_pages: page.total_pages,
            total_items: page.total_items,
        })
    }

    /// Totals and means over already-derived rows.
    pub fn aggregate(&self, rows: &[DailyMetrics]) -> Result<AggregateMetrics> {
        Ok(aggregate(rows)?)
    }

    /// Rows and totals for a printed or shared report.
    pub fn summarize(&self, filter: &ViewFilter) -> Result<PeriodSummary> {
        let rows = self.derive_view(filter)?;
        let aggregate = aggregate(&rows)?;
        Ok(PeriodSummary { rows, aggregate })
    }

    /// Insert a reading or replace the one already recorded for its date.
    ///
    /// Blank fields become "0" and the reading must then validate.
    pub fn upsert(&self, mut reading: RawReading) -> Result<Upsert> {
        reading.fill_blanks();
        reading.validate()?;
        let mut records = self.store.get_records()?;
        let outcome = match records.iter_mut().find(|r| r.date == reading.date) {
            Some(existing) => {
                *existing = reading;
                Upsert::Updated
            }
            None => {
                records.push(reading);
                Upsert::Added
            }
        };
        self.store.save_records(&records)?;
        log::info!("logbook: {:?} reading, {} days stored", outcome, records.len());
        Ok(outcome)
    }

    /// Remove the reading for `date`.
    pub fn delete(&self, date: NaiveDate) -> Result<()> {
        let mut records = self.store.get_records()?;
        let before = records.len();
        records.retain(|r| r.date != date);
        if records.len() == before {
            return Err(LogbookError::RecordNotFound(date));
        }
        self.store.save_records(&records)?;
        log::info!("logbook: deleted reading for {}", date);
        Ok(())
    }
}
