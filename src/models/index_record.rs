use crate::constants::csv_column;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::sync::Arc;

/// One row of the index dump: a single index observed on a single date.
///
/// Values are kept exactly as they appeared in the source (trimmed), keyed by
/// the header of the file they came from. Numeric columns are only coerced when
/// a caller asks for them through the typed accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexRecord {
    /// Header shared by every record of the same dataset
    columns: Arc<[String]>,
    values: Box<[String]>,
}

impl IndexRecord {
    /// Build a record from a shared header and one row of values.
    ///
    /// The caller guarantees `values.len() == columns.len()`; the parser
    /// rejects ragged rows before they get here.
    pub fn new(columns: Arc<[String]>, values: Vec<String>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self {
            columns,
            values: values.into_boxed_slice(),
        }
    }

    /// Raw string value of a column, if the header has it
    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i))
            .map(String::as_str)
    }

    /// Numeric value of a column.
    ///
    /// Thousands separators are tolerated ("1,234.5"). Empty cells and
    /// placeholders such as "-" give `None`.
    pub fn get_f64(&self, column: &str) -> Option<f64> {
        let raw = self.get(column)?.trim();
        if raw.is_empty() {
            return None;
        }
        let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
        cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// `(column, value)` pairs in header order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn index_name(&self) -> Option<&str> {
        self.get(csv_column::INDEX_NAME)
    }

    /// Date in the source's own format; never reparsed
    pub fn index_date(&self) -> Option<&str> {
        self.get(csv_column::INDEX_DATE)
    }

    pub fn open(&self) -> Option<f64> {
        self.get_f64(csv_column::OPEN_INDEX_VALUE)
    }

    pub fn high(&self) -> Option<f64> {
        self.get_f64(csv_column::HIGH_INDEX_VALUE)
    }

    pub fn low(&self) -> Option<f64> {
        self.get_f64(csv_column::LOW_INDEX_VALUE)
    }

    pub fn close(&self) -> Option<f64> {
        self.get_f64(csv_column::CLOSING_INDEX_VALUE)
    }

    pub fn volume(&self) -> Option<f64> {
        self.get_f64(csv_column::VOLUME)
    }

    /// Turnover in crore rupees
    pub fn turnover_rs_cr(&self) -> Option<f64> {
        self.get_f64(csv_column::TURNOVER_RS_CR)
    }

    pub fn change_percent(&self) -> Option<f64> {
        self.get_f64(csv_column::CHANGE_PERCENT)
    }

    pub fn points_change(&self) -> Option<f64> {
        self.get_f64(csv_column::POINTS_CHANGE)
    }
}

/// Serialized as a flat JSON object keyed by the source header, in header order.
impl Serialize for IndexRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}
