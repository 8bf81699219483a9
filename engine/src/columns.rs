use hashbrown::HashMap;

/// Ordered sequence of distinct column labels, with position lookup by label.
#[derive(Clone, Debug, Default)]
pub struct ColumnIndex {
    labels: Vec<String>,
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `label` if not already present. Returns the position of the
    /// label either way.
    pub fn insert(&mut self, label: &str) -> usize {
        if let Some(&position) = self.positions.get(label) {
            return position;
        }
        let position = self.labels.len();
        self.labels.push(label.to_owned());
        self.positions.insert(label.to_owned(), position);
        position
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.positions.get(label).copied()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.positions.contains_key(label)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl PartialEq for ColumnIndex {
    fn eq(&self, other: &Self) -> bool {
        self.labels == other.labels
    }
}

impl<S: AsRef<str>> FromIterator<S> for ColumnIndex {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut index = Self::new();
        for label in iter {
            index.insert(label.as_ref());
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    #[gtest]
    fn insert_keeps_first_seen_order() {
        let mut index = ColumnIndex::new();
        expect_eq!(index.insert("b"), 0);
        expect_eq!(index.insert("a"), 1);
        expect_eq!(index.insert("b"), 0);
        expect_eq!(index.labels(), &["b".to_string(), "a".to_string()][..]);
        expect_eq!(index.position("a"), Some(1));
        expect_eq!(index.position("c"), None);
    }
}
