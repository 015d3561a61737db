use crate::models::IndexRecord;
use std::sync::Arc;

/// One generation of parsed records, in source row order.
///
/// A dataset is never edited after construction. Refreshing means building a
/// new one and swapping it into the store.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    columns: Arc<[String]>,
    records: Vec<IndexRecord>,
}

impl Dataset {
    pub fn new(columns: Arc<[String]>, records: Vec<IndexRecord>) -> Self {
        Self { columns, records }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Header names, trimmed, in file order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[IndexRecord] {
        &self.records
    }

    /// Records in `[start, end)`, clamped to the dataset bounds.
    ///
    /// Never panics: a start past the end gives an empty slice and an
    /// inverted range is treated as empty.
    pub fn slice(&self, start: usize, end: usize) -> &[IndexRecord] {
        let len = self.records.len();
        let start = start.min(len);
        let end = end.clamp(start, len);
        &self.records[start..end]
    }

    /// Distinct index names in first-seen order
    pub fn index_names(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.records
            .iter()
            .filter_map(|r| r.index_name())
            .filter(|name| seen.insert(*name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(names: &[&str]) -> Dataset {
        let columns: Arc<[String]> = vec!["index_name".to_string()].into();
        let records = names
            .iter()
            .map(|n| IndexRecord::new(columns.clone(), vec![n.to_string()]))
            .collect();
        Dataset::new(columns, records)
    }

    #[test]
    fn test_slice_clamps() {
        let ds = dataset(&["A", "B", "C"]);
        assert_eq!(ds.slice(0, 2).len(), 2);
        assert_eq!(ds.slice(2, 10).len(), 1);
        assert!(ds.slice(3, 4).is_empty());
        assert!(ds.slice(10, 20).is_empty());
        assert!(ds.slice(2, 1).is_empty());
        assert!(ds.slice(usize::MAX, usize::MAX).is_empty());
    }

    #[test]
    fn test_empty_dataset() {
        let ds = Dataset::empty();
        assert!(ds.is_empty());
        assert!(ds.columns().is_empty());
        assert!(ds.slice(0, 10).is_empty());
    }

    #[test]
    fn test_index_names_dedup_in_order() {
        let ds = dataset(&["Nifty 50", "Nifty Bank", "Nifty 50", "Nifty IT"]);
        assert_eq!(ds.index_names(), vec!["Nifty 50", "Nifty Bank", "Nifty IT"]);
    }
}
