use crate::{cell::Cell, columns::ColumnIndex};

/// Table of [Cell]s addressed by output column label.
///
/// Every row has exactly one cell per column.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    columns: ColumnIndex,
    rows: Vec<Vec<Cell>>,
}

/// Output of projecting a single raw table.
pub type ProjectedTable = Dataset;

/// Union of all projected tables of an extraction run.
pub type CombinedDataset = Dataset;

impl Dataset {
    pub fn new(columns: ColumnIndex) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Creates a dataset with no columns and `num_rows` zero-width rows.
    pub fn zero_width(num_rows: usize) -> Self {
        Self {
            columns: ColumnIndex::new(),
            rows: vec![Vec::new(); num_rows],
        }
    }

    pub fn columns(&self) -> &ColumnIndex {
        &self.columns
    }

    pub fn labels(&self) -> &[String] {
        self.columns.labels()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<Cell>> {
        self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Appends a row, padding it with [Cell::Absent] or truncating it to the
    /// column count.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Absent);
        self.rows.push(row);
    }

    /// Returns the cell at `row` under column `label`.
    pub fn get(&self, row: usize, label: &str) -> Option<&Cell> {
        let position = self.columns.position(label)?;
        self.rows.get(row)?.get(position)
    }

    /// Returns all cells of column `label`, in row order.
    pub fn column(&self, label: &str) -> Option<Vec<&Cell>> {
        let position = self.columns.position(label)?;
        Some(self.rows.iter().map(|row| &row[position]).collect())
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    #[gtest]
    fn push_row_pads_to_width() {
        let mut dataset = Dataset::new(["a", "b"].into_iter().collect());
        dataset.push_row(vec![Cell::from("x")]);
        expect_eq!(dataset.rows(), &[vec![Cell::from("x"), Cell::Absent]][..]);
        expect_eq!(dataset.get(0, "b"), Some(&Cell::Absent));
        expect_eq!(dataset.get(0, "c"), None);
    }
}
