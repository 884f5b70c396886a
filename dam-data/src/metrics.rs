//! Daily water balance derivation.
//!
//! For a reading on day `d` with level `cote`:
//!
//! ```text
//! surface     = surface_curve[cote]                  (0 when not calibrated)
//! volume      = volume_curve[cote]                   (0 when not calibrated)
//! gains       = volume(d) - volume(d - 1)            (0 without a reading on d - 1)
//! evaporation = surface * lectureBac / 1000 * pan_coefficient
//! defluent    = evaporation + vdf + dvr + fuites + transfert
//! affluent    = gains + defluent
//! taux        = volume * 100 / max_capacity
//! ```
//!
//! All values are kept unrounded; rounding belongs to presentation.

use chrono::NaiveDate;
use dam_core::{CalibrationContext, RawReading};
use serde::Serialize;

/// The derived balance for one day. Volumes in Hm³ unless noted.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DailyMetrics {
    pub date: NaiveDate,
    /// Level (m)
    pub cote: f64,
    /// Lake surface from the surface curve
    pub surface: f64,
    pub volume: f64,
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
    /// Evaporation pan reading (mm)
    pub lecture_bac: f64,
    /// Fill rate (%)
    pub taux: f64,
    /// The level was found in the surface curve
    pub surface_found: bool,
    /// The level was found in the volume curve
    pub volume_found: bool,
    /// A reading exists for the previous calendar day
    pub previous_day_found: bool,
    /// The previous day's level was found in the volume curve
    pub previous_volume_found: bool,
}

impl DailyMetrics {
    /// False when any calibrated quantity this day relies on was substituted
    /// by 0, which typically means the level is outside the surveyed range.
    pub fn is_fully_calibrated(&self) -> bool {
        self.surface_found
            && self.volume_found
            && (!self.previous_day_found || self.previous_volume_found)
    }
}

/// Derive one day's metrics.
///
/// `previous` must be the reading for the calendar day before
/// `record.date`, looked up in the complete store, or `None` if there is no
/// such reading. Pure: no I/O, no retained state, never fails.
pub fn derive(
    record: &RawReading,
    previous: Option<&RawReading>,
    context: &CalibrationContext,
) -> DailyMetrics {
    let surface_hit = context.surface.lookup(record.cote.as_str());
    let volume_hit = context.volume.lookup(record.cote.as_str());
    if surface_hit.is_none() || volume_hit.is_none() {
        log::debug!(
            "metrics: level {:?} on {} not calibrated (surface: {}, volume: {})",
            record.cote,
            record.date,
            surface_hit.is_some(),
            volume_hit.is_some()
        );
    }
    let surface = surface_hit.unwrap_or(0.0);
    let volume = volume_hit.unwrap_or(0.0);

    let previous_volume = previous.map(|p| context.volume.lookup(p.cote.as_str()));
    let gains = match previous_volume {
        Some(prev) => volume - prev.unwrap_or(0.0),
        None => 0.0,
    };

    let vdf = record.vdf();
    let dvr = record.dvr();
    let fuites = record.fuites();
    let transfert = record.transfert();
    let lecture_bac = record.lecture_bac();

    let constants = &context.constants;
    let evaporation = surface * lecture_bac / 1000.0 * constants.pan_coefficient;
    let defluent = evaporation + vdf + dvr + fuites + transfert;
    let affluent = gains + defluent;
    let taux = volume * 100.0 / constants.max_capacity_hm3;

    DailyMetrics {
        date: record.date,
        cote: record.cote(),
        surface,
        volume,
        gains,
        evaporation,
        vdf,
        dvr,
        fuites,
        transfert,
        affluent,
        defluent,
        pluie: record.pluie(),
        lecture_bac,
        taux,
        surface_found: surface_hit.is_some(),
        volume_found: volume_hit.is_some(),
        previous_day_found: previous.is_some(),
        previous_volume_found: matches!(previous_volume, Some(Some(_))),
    }
}
