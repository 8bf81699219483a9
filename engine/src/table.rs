use std::ops::{Deref, DerefMut};

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Unprocessed table as produced by a document parsing backend: a header row
/// followed by data rows.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct RawTable {
    pub header: Row,
    pub rows: Vec<Row>,
}

impl RawTable {
    pub fn new(header: impl Into<Row>, rows: impl IntoIterator<Item = impl Into<Row>>) -> Self {
        Self {
            header: header.into(),
            rows: rows.into_iter().map(Into::into).collect(),
        }
    }

    /// Splits a grid of rows into a table, taking the first row as the header.
    ///
    /// Returns `None` for an empty grid.
    pub fn from_grid(grid: Vec<Row>) -> Option<Self> {
        let mut rows = grid.into_iter();
        let header = rows.next()?;
        Some(Self {
            header,
            rows: rows.collect(),
        })
    }

    /// Maps each distinct header label to its column position.
    ///
    /// When a label is repeated in the header, the first occurrence wins.
    pub fn header_positions(&self) -> HashMap<&str, usize> {
        let mut positions = HashMap::with_capacity(self.header.len());
        for (index, label) in self.header.iter().enumerate() {
            positions.entry(label.as_str()).or_insert(index);
        }
        positions
    }
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Row(pub Vec<String>);

impl Deref for Row {
    type Target = Vec<String>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Row {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<C, S> From<C> for Row
where
    C: IntoIterator<Item = S>,
    S: Into<String>,
{
    fn from(value: C) -> Self {
        Row(value.into_iter().map(Into::into).collect())
    }
}
