use crate::model::ProductRecord;

/// Category used when a product page has no usable breadcrumb
pub const DEFAULT_CATEGORY: &str = "Default";

/// Products grouped by category
///
/// Categories keep the order in which they were first seen and records keep
/// their discovery order within a category, so exported files are stable
/// across identical runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryGroup {
    groups: Vec<(String, Vec<ProductRecord>)>,
}

impl CategoryGroup {
    /// Creates an empty group
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record under its category
    ///
    /// Records with an empty category are filed under [`DEFAULT_CATEGORY`].
    pub fn insert(&mut self, record: ProductRecord) {
        let category = if record.category.trim().is_empty() {
            DEFAULT_CATEGORY
        } else {
            record.category.as_str()
        };

        match self.groups.iter_mut().find(|(name, _)| name == category) {
            Some((_, records)) => records.push(record),
            None => {
                let name = category.to_string();
                self.groups.push((name, vec![record]));
            }
        }
    }

    /// Records filed under a category
    pub fn get(&self, category: &str) -> Option<&[ProductRecord]> {
        self.groups
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, records)| records.as_slice())
    }

    /// Iterates over categories and their records in discovery order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ProductRecord])> {
        self.groups
            .iter()
            .map(|(name, records)| (name.as_str(), records.as_slice()))
    }

    /// Category names in discovery order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(name, _)| name.as_str())
    }

    /// Number of categories
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of records across all categories
    pub fn total_records(&self) -> usize {
        self.groups.iter().map(|(_, records)| records.len()).sum()
    }
}
