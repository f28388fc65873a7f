use crate::table::column::ColumnType;
use chrono::Duration;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::NaiveTime;
use chrono::Timelike;
use std::fmt::Display;

/// A single value of a table cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CellValue {
    /// Absent value (empty field, null literal, or spreadsheet error)
    #[default]
    Missing,
    /// Boolean values (true/false)
    Bool(bool),
    /// 64-bit signed integers
    Int(i64),
    /// Double precision floating point numbers, never NaN
    Float(f64),
    /// Free text
    Text(String),
    /// Date and time values
    DateTime(NaiveDateTime),
    /// Date-only values
    Date(NaiveDate),
    /// Time-only values
    Time(NaiveTime),
}

/// Hashable view of a cell, used to compare whole rows.
#[derive(Debug, Hash, PartialEq, Eq)]
pub(crate) enum CellKey<'a> {
    Missing,
    Bool(bool),
    Int(i64),
    Float(u64),
    Text(&'a str),
    DateTime(NaiveDateTime),
    Date(NaiveDate),
    Time(NaiveTime),
}

impl CellValue {
    /// Returns true if the cell holds no value.
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// Extracts the numeric value as a double.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(value) => Some(*value as f64),
            CellValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// The most specific column type that can hold this value.
    pub(crate) fn candidate_type(&self) -> Option<ColumnType> {
        match self {
            CellValue::Missing => None,
            CellValue::Bool(_) => Some(ColumnType::Boolean),
            CellValue::Int(_) => Some(ColumnType::BigInt),
            CellValue::Float(value) if value.fract() == 0.0 && fits_i64(*value) => Some(ColumnType::BigInt),
            CellValue::Float(_) => Some(ColumnType::Double),
            CellValue::Text(_) => Some(ColumnType::Varchar),
            CellValue::DateTime(_) => Some(ColumnType::Timestamp),
            CellValue::Date(_) => Some(ColumnType::Date),
            CellValue::Time(_) => Some(ColumnType::Time),
        }
    }

    /// Converts the value to the representation used by columns of `kind`.
    pub(crate) fn cast(self, kind: ColumnType) -> CellValue {
        match (kind, self) {
            (_, CellValue::Missing) => CellValue::Missing,
            (ColumnType::BigInt, CellValue::Float(value)) => CellValue::Int(value as i64),
            (ColumnType::Double, CellValue::Int(value)) => CellValue::Float(value as f64),
            (ColumnType::Timestamp, CellValue::Date(date)) => CellValue::DateTime(date.and_time(NaiveTime::MIN)),
            (ColumnType::Varchar, CellValue::Text(text)) => CellValue::Text(text),
            (ColumnType::Varchar, value) => CellValue::Text(value.to_string()),
            (_, value) => value,
        }
    }

    pub(crate) fn key(&self) -> CellKey<'_> {
        match self {
            CellValue::Missing => CellKey::Missing,
            CellValue::Bool(value) => CellKey::Bool(*value),
            CellValue::Int(value) => CellKey::Int(*value),
            // -0.0 and 0.0 are the same value
            CellValue::Float(value) if *value == 0.0 => CellKey::Float(0f64.to_bits()),
            CellValue::Float(value) => CellKey::Float(value.to_bits()),
            CellValue::Text(value) => CellKey::Text(value),
            CellValue::DateTime(value) => CellKey::DateTime(*value),
            CellValue::Date(value) => CellKey::Date(*value),
            CellValue::Time(value) => CellKey::Time(*value),
        }
    }
}

impl Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Missing => Ok(()),
            CellValue::Bool(value) => write!(f, "{}", if *value { "True" } else { "False" }),
            CellValue::Int(value) => write!(f, "{value}"),
            CellValue::Float(value) => write!(f, "{}", to_float_string(*value)),
            CellValue::Text(value) => write!(f, "{value}"),
            CellValue::DateTime(value) => write!(f, "{}", value.format("%Y-%m-%d %H:%M:%S")),
            CellValue::Date(value) => write!(f, "{}", value.format("%Y-%m-%d")),
            CellValue::Time(value) => write!(f, "{}", value.format("%H:%M:%S")),
        }
    }
}

/// True if the integral double converts to an i64 without saturating.
fn fits_i64(value: f64) -> bool {
    value >= i64::MIN as f64 && value < i64::MAX as f64
}

/// Formats a double so that reading it back yields a double again:
/// integral values keep a `.0` suffix.
pub(crate) fn to_float_string(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// Converts a date to an Excel serial day number (1900 date system).
/// Handles the Lotus 1-2-3 leap year bug: serials before March 1900 are shifted by one.
pub(crate) fn to_serial_days(date: NaiveDate) -> i64 {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30).expect("NaiveDate Literal");
    let days = (date - epoch).num_days();
    if days < 61 { days - 1 } else { days }
}

/// Converts a time to the fraction of a day used by Excel.
pub(crate) fn to_serial_fraction(time: NaiveTime) -> f64 {
    let micros = time.num_seconds_from_midnight() as f64 * 1_000_000f64 + (time.nanosecond() / 1_000) as f64;
    micros / 86_400_000_000f64
}

/// Converts a date/time to an Excel serial number (1900 date system).
pub(crate) fn to_serial(datetime: NaiveDateTime) -> f64 {
    to_serial_days(datetime.date()) as f64 + to_serial_fraction(datetime.time())
}

/// Splits an Excel time serial (below one day) into a time of day.
pub(crate) fn from_serial_fraction(value: f64) -> NaiveTime {
    let micros = (value.fract() * 86_400_000_000f64).round() as i64;
    NaiveTime::MIN + Duration::microseconds(micros)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn float_string_keeps_fraction_marker() {
        assert_eq!(to_float_string(2.0), "2.0");
        assert_eq!(to_float_string(1.5), "1.5");
        assert_eq!(to_float_string(-0.25), "-0.25");
        assert_eq!(to_float_string(f64::INFINITY), "inf");
    }

    #[test]
    fn serial_days_match_excel() {
        assert_eq!(to_serial_days(date(1900, 1, 1)), 1);
        assert_eq!(to_serial_days(date(1900, 2, 28)), 59);
        assert_eq!(to_serial_days(date(1900, 3, 1)), 61);
        assert_eq!(to_serial_days(date(2024, 1, 1)), 45292);
    }

    #[test]
    fn serial_fraction_of_noon() {
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        assert_eq!(to_serial_fraction(noon), 0.5);
        assert_eq!(from_serial_fraction(0.5), noon);
    }

    #[test]
    fn cast_to_column_types() {
        assert_eq!(CellValue::Float(3.0).cast(ColumnType::BigInt), CellValue::Int(3));
        assert_eq!(CellValue::Int(3).cast(ColumnType::Double), CellValue::Float(3.0));
        assert_eq!(CellValue::Bool(true).cast(ColumnType::Varchar), CellValue::Text("True".to_owned()));
        assert_eq!(CellValue::Missing.cast(ColumnType::Varchar), CellValue::Missing);
    }

    #[test]
    fn only_representable_integers_are_int_candidates() {
        assert_eq!(CellValue::Float(2.0).candidate_type(), Some(ColumnType::BigInt));
        assert_eq!(CellValue::Float(-9.0e18).candidate_type(), Some(ColumnType::BigInt));
        assert_eq!(CellValue::Float(1e20).candidate_type(), Some(ColumnType::Double));
        assert_eq!(CellValue::Float(9.223372036854775807e18).candidate_type(), Some(ColumnType::Double));
        assert_eq!(CellValue::Float(f64::INFINITY).candidate_type(), Some(ColumnType::Double));
    }

    #[test]
    fn zero_keys_are_equal() {
        assert_eq!(CellValue::Float(0.0).key(), CellValue::Float(-0.0).key());
        assert_ne!(CellValue::Int(1).key(), CellValue::Float(1.0).key());
    }
}
