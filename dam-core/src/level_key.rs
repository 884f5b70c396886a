use dam_utils::numbers::parse_decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fractional digits that render any f64 of magnitude at least 2^-8 exactly.
/// Smaller magnitudes always round to a key of zero.
const EXACT_DIGITS: usize = 60;

/// A reservoir level normalized for calibration lookups.
///
/// Calibration files and operators write the same level as "105,00",
/// "105.00" or "105". Comparing raw floats would miss matches, so every level
/// is rounded to two decimals and stored as an integer count of centimetres.
/// Rounding works on the exact decimal value of the float and sends halves
/// away from zero, so `104.125` keys as `104.13` and `1.005` (really
/// `1.00499...`) keys as `1.00`.
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Copy, Clone, Serialize, Deserialize)]
pub struct LevelKey(i64);

impl LevelKey {
    /// Normalize a numeric level. `None` for NaN, infinities and values too
    /// large to key.
    pub fn from_level(level: f64) -> Option<LevelKey> {
        if !level.is_finite() {
            return None;
        }
        let exact = format!("{:.*}", EXACT_DIGITS, level.abs());
        let (whole, fraction) = exact.split_once('.')?;
        let digits = fraction.as_bytes();
        let hundredths = i64::from(digits[0] - b'0') * 10 + i64::from(digits[1] - b'0');
        let round_up = digits[2] >= b'5';

        let mut magnitude = whole
            .parse::<i64>()
            .ok()?
            .checked_mul(100)?
            .checked_add(hundredths)?;
        if round_up {
            magnitude = magnitude.checked_add(1)?;
        }
        Some(LevelKey(if level < 0.0 { -magnitude } else { magnitude }))
    }

    /// Normalize a level written as text, with either decimal separator.
    pub fn parse(text: &str) -> Option<LevelKey> {
        parse_decimal(text).and_then(LevelKey::from_level)
    }

    /// The level in centimetres.
    pub fn hundredths(&self) -> i64 {
        self.0
    }

    /// The normalized level as a number.
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for LevelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

/// Anything that can be used as a calibration lookup level.
pub trait Level {
    fn level_key(&self) -> Option<LevelKey>;
}

impl Level for LevelKey {
    fn level_key(&self) -> Option<LevelKey> {
        Some(*self)
    }
}

impl Level for f64 {
    fn level_key(&self) -> Option<LevelKey> {
        LevelKey::from_level(*self)
    }
}

impl Level for str {
    fn level_key(&self) -> Option<LevelKey> {
        LevelKey::parse(self)
    }
}

impl Level for String {
    fn level_key(&self) -> Option<LevelKey> {
        LevelKey::parse(self)
    }
}

impl<T: Level + ?Sized> Level for &T {
    fn level_key(&self) -> Option<LevelKey> {
        (**self).level_key()
    }
}
