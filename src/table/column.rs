use std::collections::HashSet;

/// Declared data type of a table column.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ColumnType {
    /// Boolean values (true/false)
    Boolean,
    /// 64-bit signed integers
    BigInt,
    /// Double-precision floating point numbers
    Double,
    /// Variable-length strings
    Varchar,
    /// Date and time
    Timestamp,
    /// Date without time component
    Date,
    /// Time without date component
    Time,
}

/// Represents a column in a table with name and data type.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    /// Column name (from header row, made unique)
    pub name: String,
    /// Column data type
    pub kind: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnType) -> Self {
        Column {
            name: name.into(),
            kind,
        }
    }
}

impl ColumnType {
    /// Returns the string representation of the column type.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Boolean => "bool",
            ColumnType::BigInt => "int64",
            ColumnType::Double => "float64",
            ColumnType::Varchar => "text",
            ColumnType::Timestamp => "datetime",
            ColumnType::Date => "date",
            ColumnType::Time => "time",
        }
    }

    /// Detects the most specific common type from a collection of candidate types.
    /// A column without any value reads as DOUBLE, inconsistent types fall back to VARCHAR.
    pub(crate) fn detect<I>(types: I) -> ColumnType
    where
        I: IntoIterator<Item = Option<ColumnType>>,
    {
        let types: Vec<ColumnType> = types.into_iter().flatten().collect();
        if types.is_empty() {
            ColumnType::Double
        } else if types.iter().all(|kind| kind.is_boolean()) {
            ColumnType::Boolean
        } else if types.iter().all(|kind| kind.is_int()) {
            ColumnType::BigInt
        } else if types.iter().all(|kind| kind.is_numeric()) {
            ColumnType::Double
        } else if types.iter().all(|kind| kind.is_date()) {
            ColumnType::Date
        } else if types.iter().all(|kind| kind.is_time()) {
            ColumnType::Time
        } else if types.iter().all(|kind| kind.is_datetime()) {
            ColumnType::Timestamp
        } else {
            ColumnType::Varchar
        }
    }

    /// Returns true if this column type represents boolean values.
    #[inline]
    pub fn is_boolean(&self) -> bool {
        matches!(self, ColumnType::Boolean)
    }

    /// Returns true if this column type represents integer values.
    #[inline]
    pub fn is_int(&self) -> bool {
        matches!(self, ColumnType::BigInt)
    }

    /// Returns true if this column type represents numeric values (integer or floating point).
    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::BigInt | ColumnType::Double)
    }

    #[inline]
    pub fn is_date(&self) -> bool {
        matches!(self, ColumnType::Date)
    }

    #[inline]
    pub fn is_time(&self) -> bool {
        matches!(self, ColumnType::Time)
    }

    /// Returns true if values of this type widen to a timestamp.
    /// A time of day has no date, so it does not.
    #[inline]
    pub fn is_datetime(&self) -> bool {
        matches!(self, ColumnType::Timestamp | ColumnType::Date)
    }
}

/// Makes header names usable as column names.
/// Blank names become `Unnamed: <index>`, repeated names get `.1`, `.2`, ... suffixes.
pub(crate) fn normalize_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::<String>::new();
    headers
        .into_iter()
        .enumerate()
        .map(|(index, header)| {
            let header = if header.trim().is_empty() {
                format!("Unnamed: {index}")
            } else {
                header
            };
            let mut name = header.clone();
            let mut suffix = 0usize;
            while seen.contains(&name) {
                suffix += 1;
                name = format!("{header}.{suffix}");
            }
            seen.insert(name.clone());
            name
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_prefers_specific_types() {
        use ColumnType::*;
        assert_eq!(ColumnType::detect(vec![Some(BigInt), None, Some(BigInt)]), BigInt);
        assert_eq!(ColumnType::detect(vec![Some(BigInt), Some(Double)]), Double);
        assert_eq!(ColumnType::detect(vec![Some(Boolean), Some(Boolean)]), Boolean);
        assert_eq!(ColumnType::detect(vec![Some(Date), Some(Timestamp)]), Timestamp);
        assert_eq!(ColumnType::detect(vec![Some(Time), Some(Timestamp)]), Varchar);
        assert_eq!(ColumnType::detect(vec![Some(Time), Some(Date)]), Varchar);
        assert_eq!(ColumnType::detect(vec![Some(BigInt), Some(Varchar)]), Varchar);
        assert_eq!(ColumnType::detect(vec![None, None]), Double);
    }

    #[test]
    fn headers_are_unique() {
        let headers = vec!["a", "", "a", "b", "a"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(normalize_headers(headers), vec!["a", "Unnamed: 1", "a.1", "b", "a.2"]);
    }

    #[test]
    fn suffix_skips_taken_names() {
        let headers = vec!["a", "a.1", "a"].into_iter().map(String::from).collect();
        assert_eq!(normalize_headers(headers), vec!["a", "a.1", "a.2"]);
    }
}
