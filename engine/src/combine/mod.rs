#[cfg(test)]
mod tests;

use crate::{
    cell::Cell,
    columns::ColumnIndex,
    dataset::{CombinedDataset, Dataset, ProjectedTable},
};

/// Unions projected tables into one dataset.
///
/// Columns are the first-seen union of every table's columns. Rows are
/// concatenated in table order, with [Cell::Absent] filling columns a table
/// lacks. A table without columns, such as one qualifying only under a
/// filter section, still contributes one all-absent row per row. Rows are
/// never deduplicated.
pub fn combine(projected: impl IntoIterator<Item = ProjectedTable>) -> CombinedDataset {
    let tables: Vec<ProjectedTable> = projected.into_iter().collect();

    let columns: ColumnIndex = tables.iter().flat_map(|table| table.labels()).collect();
    let mut combined = Dataset::new(columns.clone());

    for table in tables {
        if table.labels().is_empty() {
            log::debug!(
                "Adding {} rows without values from a table without output columns",
                table.num_rows()
            );
        }

        let targets: Vec<usize> = table
            .labels()
            .iter()
            .filter_map(|label| columns.position(label))
            .collect();
        for source_row in table.into_rows() {
            let mut row = vec![Cell::Absent; columns.len()];
            for (&target, cell) in targets.iter().zip(source_row) {
                row[target] = cell;
            }
            combined.push_row(row);
        }
    }

    combined
}
