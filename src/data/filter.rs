use super::model::{Dataset, Record, YearRange};

// ---------------------------------------------------------------------------
// FilteredDataset – a year-restricted view over a Dataset
// ---------------------------------------------------------------------------

/// Records of a [`Dataset`] whose year falls inside a [`YearRange`],
/// in the dataset's original order.
///
/// Borrows from the dataset; it is rebuilt on every change of bounds or
/// file and never outlives the render pass that asked for it.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredDataset<'a> {
    pub range: YearRange,
    records: Vec<&'a Record>,
}

impl<'a> FilteredDataset<'a> {
    pub fn records(&self) -> &[&'a Record] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.records.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Keep the records with `range.start <= year <= range.end`.
///
/// Never fails: out-of-span or inverted bounds just select nothing.
pub fn filter_by_years(dataset: &Dataset, range: YearRange) -> FilteredDataset<'_> {
    let records = dataset
        .records()
        .iter()
        .filter(|r| range.contains(r.year))
        .collect();

    FilteredDataset { range, records }
}
