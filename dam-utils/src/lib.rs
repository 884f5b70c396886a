//! Shared utility functions for the reservoir logbook crates.

/// Date utility functions
pub mod dates {
    use chrono::{Datelike, NaiveDate};

    /// Storage format for reading dates: "YYYY-MM-DD"
    pub const ISO_FORMAT: &str = "%Y-%m-%d";

    /// Display format used on reports (fr-FR locale): "DD/MM/YYYY"
    pub const FR_FORMAT: &str = "%d/%m/%Y";

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format(ISO_FORMAT).to_string()
    }

    /// Format a NaiveDate the way French operators read it: "DD/MM/YYYY"
    pub fn format_date_fr(date: &NaiveDate) -> String {
        date.format(FR_FORMAT).to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s.trim(), ISO_FORMAT)?)
    }

    /// The calendar day immediately before `date`.
    ///
    /// Only `None` for `NaiveDate::MIN`.
    pub fn previous_day(date: &NaiveDate) -> Option<NaiveDate> {
        date.pred_opt()
    }

    /// A calendar month, as selected by the month search ("YYYY-MM").
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct YearMonth {
        pub year: i32,
        pub month: u32,
    }

    impl YearMonth {
        /// Parse "YYYY-MM". Rejects months outside 1..=12.
        pub fn parse(s: &str) -> anyhow::Result<YearMonth> {
            let (year, month) = s
                .trim()
                .split_once('-')
                .ok_or_else(|| anyhow::anyhow!("expected YYYY-MM, got {:?}", s))?;
            let year: i32 = year.parse()?;
            let month: u32 = month.parse()?;
            if !(1..=12).contains(&month) {
                anyhow::bail!("month out of range: {}", month);
            }
            Ok(YearMonth { year, month })
        }

        /// The month a date falls in.
        pub fn of(date: &NaiveDate) -> YearMonth {
            YearMonth {
                year: date.year(),
                month: date.month(),
            }
        }

        pub fn contains(&self, date: &NaiveDate) -> bool {
            YearMonth::of(date) == *self
        }

        /// "MM/YYYY", as printed in monthly report titles.
        pub fn format_fr(&self) -> String {
            format!("{:02}/{}", self.month, self.year)
        }
    }

}

/// Locale-tolerant decimal helpers.
///
/// Operators type levels and volumes with either a comma or a dot as the
/// decimal separator ("105,00" and "105.00" are the same level).
pub mod numbers {
    /// Replace every comma with a dot and trim surrounding whitespace.
    pub fn normalize_decimal(s: &str) -> String {
        s.replace(',', ".").trim().to_string()
    }

    /// Parse a decimal written with either separator.
    ///
    /// Returns `None` for empty text, non-numeric text and non-finite values.
    pub fn parse_decimal(s: &str) -> Option<f64> {
        let normalized = normalize_decimal(s);
        if normalized.is_empty() {
            return None;
        }
        normalized
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
    }

    /// Parse a decimal, treating anything unparseable as 0.
    pub fn parse_decimal_or_zero(s: &str) -> f64 {
        parse_decimal(s).unwrap_or(0.0)
    }

    /// Fixed-point rendering with `places` digits after the dot.
    ///
    /// Negative zero renders as "0.000", not "-0.000".
    pub fn format_fixed(value: f64, places: usize) -> String {
        format!("{:.*}", places, value + 0.0)
    }

}
