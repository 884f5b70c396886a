//! Period totals and averages over derived daily metrics.
//!
//! The aggregator never goes back to raw readings: it folds exactly the
//! [`DailyMetrics`] values shown on each row, so a TOTAL line always equals
//! the sum of the rows above it.

use serde::Serialize;
use thiserror::Error;

use crate::metrics::DailyMetrics;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateError {
    /// No days to aggregate; the average would be undefined
    #[error("cannot aggregate an empty sequence of days")]
    EmptySequence,
}

/// The balance quantities that are summed over a period.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct BalanceTotals {
    pub gains: f64,
    pub evaporation: f64,
    pub vdf: f64,
    pub dvr: f64,
    pub fuites: f64,
    pub transfert: f64,
    pub affluent: f64,
    pub defluent: f64,
    /// Rainfall (mm)
    pub pluie: f64,
}

impl BalanceTotals {
    fn add(&mut self, day: &DailyMetrics) {
        self.gains += day.gains;
        self.evaporation += day.evaporation;
        self.vdf += day.vdf;
        self.dvr += day.dvr;
        self.fuites += day.fuites;
        self.transfert += day.transfert;
        self.affluent += day.affluent;
        self.defluent += day.defluent;
        self.pluie += day.pluie;
    }

    fn divided_by(&self, count: f64) -> BalanceTotals {
        BalanceTotals {
            gains: self.gains / count,
            evaporation: self.evaporation / count,
            vdf: self.vdf / count,
            dvr: self.dvr / count,
            fuites: self.fuites / count,
            transfert: self.transfert / count,
            affluent: self.affluent / count,
            defluent: self.defluent / count,
            pluie: self.pluie / count,
        }
    }
}

/// Sums and arithmetic means over a non-empty run of days.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct AggregateMetrics {
    pub count: usize,
    pub sum: BalanceTotals,
    pub average: BalanceTotals,
}

/// Fold a sequence of derived days into totals and means.
///
/// The caller picks the sequence (one day, a month, a period, everything).
pub fn aggregate<'a, I>(days: I) -> Result<AggregateMetrics, AggregateError>
where
    I: IntoIterator<Item = &'a DailyMetrics>,
{
    let mut sum = BalanceTotals::default();
    let mut count = 0usize;
    for day in days {
        sum.add(day);
        count += 1;
    }
    if count == 0 {
        return Err(AggregateError::EmptySequence);
    }
    Ok(AggregateMetrics {
        count,
        sum,
        average: sum.divided_by(count as f64),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::derive;
    use chrono::NaiveDate;
    use dam_core::{CalibrationContext, CalibrationTable, Field, RawReading};

    fn context() -> CalibrationContext {
        CalibrationContext::new(
            CalibrationTable::load("104;1150\n105;1200.5\n"),
            CalibrationTable::load("104;290\n105;300.75\n"),
        )
    }

    fn days() -> Vec<DailyMetrics> {
        let ctx = context();
        let first = RawReading::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
            .with(Field::Cote, "104")
            .with(Field::LectureBac, "6")
            .with(Field::Vdf, "0.8")
            .with(Field::Pluie, "12.5");
        let second = RawReading::new(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap())
            .with(Field::Cote, "105")
            .with(Field::LectureBac, "8")
            .with(Field::Vdf, "1.2")
            .with(Field::Dvr, "0.3")
            .with(Field::Fuites, "0.05");
        vec![derive(&first, None, &ctx), derive(&second, Some(&first), &ctx)]
    }

    #[test]
    fn test_empty_sequence_is_rejected() {
        let none: Vec<DailyMetrics> = Vec::new();
        assert_eq!(aggregate(&none), Err(AggregateError::EmptySequence));
    }

    #[test]
    fn test_single_day_average_is_the_day() {
        let days = days();
        let agg = aggregate(&days[1..]).unwrap();
        let day = &days[1];
        assert_eq!(agg.count, 1);
        assert_eq!(agg.average.gains, day.gains);
        assert_eq!(agg.average.evaporation, day.evaporation);
        assert_eq!(agg.average.vdf, day.vdf);
        assert_eq!(agg.average.dvr, day.dvr);
        assert_eq!(agg.average.fuites, day.fuites);
        assert_eq!(agg.average.transfert, day.transfert);
        assert_eq!(agg.average.affluent, day.affluent);
        assert_eq!(agg.average.defluent, day.defluent);
        assert_eq!(agg.average.pluie, day.pluie);
    }

    #[test]
    fn test_sums_match_rows() {
        let days = days();
        let agg = aggregate(&days).unwrap();
        assert_eq!(agg.count, 2);
        assert_eq!(agg.sum.gains, days[0].gains + days[1].gains);
        assert_eq!(agg.sum.affluent, days[0].affluent + days[1].affluent);
        assert_eq!(agg.sum.defluent, days[0].defluent + days[1].defluent);
        assert_eq!(agg.sum.evaporation, days[0].evaporation + days[1].evaporation);
        assert_eq!(agg.sum.pluie, 12.5);
        assert!((agg.sum.gains - 10.75).abs() < 1e-9);
        assert!((agg.average.vdf - 1.0).abs() < 1e-9);
    }
}
