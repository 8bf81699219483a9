#[cfg(test)]
mod tests;

use crate::{
    cell::Cell,
    columns::ColumnIndex,
    dataset::{Dataset, ProjectedTable},
    matcher::MatchResult,
    spec::Section,
    table::RawTable,
};

/// Reshapes `table` according to `section`.
///
/// A rename section produces one output column per declared entry with a
/// source, in declaration order. A filter section produces no columns but
/// keeps one (empty) row per input row. A repeated header label resolves to
/// its first occurrence.
pub fn project(table: &RawTable, section: &Section) -> ProjectedTable {
    let Section::Rename(rename) = section else {
        return Dataset::zero_width(table.rows.len());
    };

    let header_positions = table.header_positions();
    let mut columns = ColumnIndex::new();
    let mut sources: Vec<Option<usize>> = Vec::new();
    for (output, source) in rename.outputs() {
        let position = columns.insert(output);
        if position == sources.len() {
            sources.push(header_positions.get(source).copied());
        }
    }

    let mut projected = Dataset::new(columns);
    for row in &table.rows {
        projected.push_row(
            sources
                .iter()
                .map(|source| {
                    source
                        .and_then(|index| row.get(index))
                        .map(|text| Cell::Text(text.clone()))
                        .unwrap_or(Cell::Absent)
                })
                .collect(),
        );
    }
    projected
}

/// Projects `table` under every section in `matched`, joining the results
/// side by side.
///
/// Output columns are the first-seen union of each section's columns in
/// declaration order; where two sections output the same label, the first
/// section's value is kept unless it is absent. Returns `None` when the
/// table qualified under no section.
pub fn project_matches(table: &RawTable, matched: &MatchResult) -> Option<ProjectedTable> {
    let (first, rest) = matched.sections.split_first()?;
    if rest.is_empty() {
        return Some(project(table, first));
    }

    let projections: Vec<ProjectedTable> = matched
        .sections
        .iter()
        .map(|section| project(table, section))
        .collect();

    let columns: ColumnIndex = projections
        .iter()
        .flat_map(|projection| projection.labels())
        .collect();
    let width = columns.len();

    let mut rows = vec![vec![Cell::Absent; width]; table.rows.len()];
    for projection in &projections {
        let targets: Vec<usize> = projection
            .labels()
            .iter()
            .filter_map(|label| columns.position(label))
            .collect();
        for (row, source_row) in rows.iter_mut().zip(projection.rows()) {
            for (&target, cell) in targets.iter().zip(source_row) {
                if row[target].is_absent() {
                    row[target] = cell.clone();
                }
            }
        }
    }

    let mut joined = Dataset::new(columns);
    for row in rows {
        joined.push_row(row);
    }
    Some(joined)
}
