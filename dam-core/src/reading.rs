use chrono::NaiveDate;
use dam_utils::numbers::{parse_decimal, parse_decimal_or_zero};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::error::ReadingError;

/// Value data entry stores for a field the operator left blank.
pub const DEFAULT_FIELD_TEXT: &str = "0";

/// The numeric inputs of a daily reading.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Field {
    /// Reservoir level (m)
    Cote,
    /// Dam release (Hm³)
    Vdf,
    /// Bottom outlet release (Hm³)
    Dvr,
    /// Leakage (Hm³)
    Fuites,
    /// Inter-basin transfer (Hm³)
    Transfert,
    /// Rainfall (mm)
    Pluie,
    /// Evaporation pan reading (mm)
    LectureBac,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Cote,
        Field::Vdf,
        Field::Dvr,
        Field::Fuites,
        Field::Transfert,
        Field::Pluie,
        Field::LectureBac,
    ];

    /// Name of the field in the persisted JSON.
    pub fn name(&self) -> &'static str {
        match self {
            Field::Cote => "cote",
            Field::Vdf => "vdf",
            Field::Dvr => "dvr",
            Field::Fuites => "fuites",
            Field::Transfert => "transfert",
            Field::Pluie => "pluie",
            Field::LectureBac => "lectureBac",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One calendar day's raw input, as typed by the operator.
///
/// Numeric fields keep the operator's text ("105,00" stays "105,00") so the
/// record round-trips through the store verbatim. Use [`RawReading::value`]
/// or the typed accessors to read them as numbers.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReading {
    pub date: NaiveDate,
    #[serde(default = "default_text", deserialize_with = "text_or_number")]
    pub cote: String,
    #[serde(default = "default_text", deserialize_with = "text_or_number")]
    pub vdf: String,
    #[serde(default = "default_text", deserialize_with = "text_or_number")]
    pub dvr: String,
    #[serde(default = "default_text", deserialize_with = "text_or_number")]
    pub fuites: String,
    #[serde(default = "default_text", deserialize_with = "text_or_number")]
    pub transfert: String,
    #[serde(default = "default_text", deserialize_with = "text_or_number")]
    pub pluie: String,
    #[serde(default = "default_text", deserialize_with = "text_or_number")]
    pub lecture_bac: String,
}

fn default_text() -> String {
    DEFAULT_FIELD_TEXT.to_string()
}

/// Older exports wrote bare JSON numbers; accept both.
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Number(f64),
        Null(()),
    }
    Ok(match TextOrNumber::deserialize(deserializer)? {
        TextOrNumber::Text(s) => s,
        TextOrNumber::Number(n) => n.to_string(),
        TextOrNumber::Null(()) => default_text(),
    })
}

impl RawReading {
    /// A reading for `date` with every numeric field at "0".
    pub fn new(date: NaiveDate) -> RawReading {
        RawReading {
            date,
            cote: default_text(),
            vdf: default_text(),
            dvr: default_text(),
            fuites: default_text(),
            transfert: default_text(),
            pluie: default_text(),
            lecture_bac: default_text(),
        }
    }

    /// Builder-style setter, mostly for data entry and tests.
    pub fn with(mut self, field: Field, text: impl Into<String>) -> RawReading {
        *self.text_mut(field) = text.into();
        self
    }

    pub fn text(&self, field: Field) -> &str {
        match field {
            Field::Cote => &self.cote,
            Field::Vdf => &self.vdf,
            Field::Dvr => &self.dvr,
            Field::Fuites => &self.fuites,
            Field::Transfert => &self.transfert,
            Field::Pluie => &self.pluie,
            Field::LectureBac => &self.lecture_bac,
        }
    }

    fn text_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Cote => &mut self.cote,
            Field::Vdf => &mut self.vdf,
            Field::Dvr => &mut self.dvr,
            Field::Fuites => &mut self.fuites,
            Field::Transfert => &mut self.transfert,
            Field::Pluie => &mut self.pluie,
            Field::LectureBac => &mut self.lecture_bac,
        }
    }

    /// Numeric value of a field. Empty or non-numeric text reads as 0.
    pub fn value(&self, field: Field) -> f64 {
        parse_decimal_or_zero(self.text(field))
    }

    pub fn cote(&self) -> f64 {
        self.value(Field::Cote)
    }

    pub fn vdf(&self) -> f64 {
        self.value(Field::Vdf)
    }

    pub fn dvr(&self) -> f64 {
        self.value(Field::Dvr)
    }

    pub fn fuites(&self) -> f64 {
        self.value(Field::Fuites)
    }

    pub fn transfert(&self) -> f64 {
        self.value(Field::Transfert)
    }

    pub fn pluie(&self) -> f64 {
        self.value(Field::Pluie)
    }

    pub fn lecture_bac(&self) -> f64 {
        self.value(Field::LectureBac)
    }

    /// Replace blank fields with "0", as the entry form does before saving.
    pub fn fill_blanks(&mut self) {
        for field in Field::ALL {
            let text = self.text_mut(field);
            if text.trim().is_empty() {
                *text = default_text();
            }
        }
    }

    /// Strict check used before a reading is accepted into the store.
    ///
    /// Every field must be a finite, non-negative decimal.
    pub fn validate(&self) -> Result<(), ReadingError> {
        for field in Field::ALL {
            let text = self.text(field);
            match parse_decimal(text) {
                None => {
                    return Err(ReadingError::InvalidNumber {
                        field,
                        value: text.to_string(),
                    })
                }
                Some(value) if value < 0.0 => {
                    return Err(ReadingError::Negative { field, value });
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}
