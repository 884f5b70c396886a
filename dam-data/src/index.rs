use chrono::NaiveDate;
use dam_core::{CalibrationContext, RawReading};
use dam_utils::dates::previous_day;
use std::collections::BTreeMap;

use crate::metrics::{derive, DailyMetrics};

/// An immutable snapshot of the record store, keyed by date.
///
/// Previous-day resolution goes through this index, so it always sees the
/// whole store no matter how the rows being derived were selected.
#[derive(Debug, Clone, Default)]
pub struct RecordIndex {
    by_date: BTreeMap<NaiveDate, RawReading>,
}

impl RecordIndex {
    /// Index a set of readings.
    ///
    /// Stores hold at most one reading per date. If that is broken and two
    /// readings share a date, the later one in `records` is kept (with a
    /// warning): it is the one returned by [`get`](Self::get) and the one
    /// used as the previous day of the following date, even though an
    /// earlier copy sits first in the store.
    pub fn new(records: Vec<RawReading>) -> RecordIndex {
        let mut by_date = BTreeMap::new();
        for record in records {
            if let Some(replaced) = by_date.insert(record.date, record) {
                log::warn!("index: duplicate reading for {}, keeping the last", replaced.date);
            }
        }
        RecordIndex { by_date }
    }

    pub fn get(&self, date: &NaiveDate) -> Option<&RawReading> {
        self.by_date.get(date)
    }

    /// The reading for the calendar day before `date`, if any.
    pub fn previous_of(&self, date: &NaiveDate) -> Option<&RawReading> {
        previous_day(date).and_then(|d| self.by_date.get(&d))
    }

    pub fn len(&self) -> usize {
        self.by_date.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }

    /// All readings, oldest first.
    pub fn readings(&self) -> impl DoubleEndedIterator<Item = &RawReading> + '_ {
        self.by_date.values()
    }

    /// Derive metrics for `record`, resolving its previous day in this index.
    pub fn derive(&self, record: &RawReading, context: &CalibrationContext) -> DailyMetrics {
        derive(record, self.previous_of(&record.date), context)
    }

    /// Derive metrics for the reading stored on `date`.
    pub fn derive_for(
        &self,
        date: &NaiveDate,
        context: &CalibrationContext,
    ) -> Option<DailyMetrics> {
        self.get(date).map(|record| self.derive(record, context))
    }

    /// Derive every reading in `records`, in the given order.
    pub fn derive_all<'a, I>(&self, records: I, context: &CalibrationContext) -> Vec<DailyMetrics>
    where
        I: IntoIterator<Item = &'a RawReading>,
    {
        records
            .into_iter()
            .map(|record| self.derive(record, context))
            .collect()
    }
}
