
use std::collections::BTreeSet;

use hashbrown::HashSet;

use crate::{
    cell::Cell,
    dataset::{CombinedDataset, Dataset},
    identifier::{IDENTIFIER_COLUMN, find_isin, normalize_isin},
    lookup::{ATTRIBUTE_LABELS, IdentifierAttributes},
    numeric::NumberFormat,
};

/// Suffix given to an attribute column whose label the dataset already uses.
const COLLISION_SUFFIX: &str = " (lookup)";

#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
#[error("dataset has no {IDENTIFIER_COLUMN:?} column to merge attributes on")]
pub struct MissingIdentifierColumnError;

/// Returns the distinct identifiers of `dataset`, as normalized ISINs.
///
/// Identifiers appearing on more than one row are reported once each.
pub fn identifiers(dataset: &Dataset) -> Result<BTreeSet<String>, MissingIdentifierColumnError> {
    let column = dataset
        .column(IDENTIFIER_COLUMN)
        .ok_or(MissingIdentifierColumnError)?;

    let mut seen = BTreeSet::new();
    let mut reported = HashSet::new();
    for cell in column {
        let Some(isin) = cell.as_text().and_then(normalize_isin) else {
            log::debug!("No ISIN in identifier cell {cell:?}");
            continue;
        };
        if !seen.insert(isin.to_owned()) && reported.insert(isin.to_owned()) {
            log::warn!("Identifier {isin} appears on more than one row");
        }
    }
    Ok(seen)
}

/// Appends the looked-up attribute columns to every row of `dataset`.
///
/// Numeric-looking cells other than the identifier are parsed with
/// `format`. Identifier cells are replaced by their normalized ISIN. Rows
/// whose identifier is missing from `attributes` get [Cell::Unresolved] in
/// every attribute column.
pub fn merge(
    dataset: &CombinedDataset,
    attributes: &IdentifierAttributes,
    format: &NumberFormat,
) -> Result<CombinedDataset, MissingIdentifierColumnError> {
    let identifier_position = dataset
        .columns()
        .position(IDENTIFIER_COLUMN)
        .ok_or(MissingIdentifierColumnError)?;

    let mut columns = dataset.columns().clone();
    for label in ATTRIBUTE_LABELS {
        let mut unique = label.to_owned();
        while columns.contains(&unique) {
            unique.push_str(COLLISION_SUFFIX);
        }
        if unique != label {
            log::warn!("Column {label:?} already present, adding lookup column as {unique:?}");
        }
        columns.insert(&unique);
    }

    let mut merged = Dataset::new(columns);
    for row in dataset.rows() {
        let mut out: Vec<Cell> = Vec::with_capacity(merged.columns().len());
        let mut isin = None;
        for (position, cell) in row.iter().enumerate() {
            if position == identifier_position {
                isin = cell.as_text().and_then(find_isin);
                out.push(isin.map(Cell::from).unwrap_or_else(|| cell.clone()));
            } else {
                out.push(format.normalize(cell.clone()));
            }
        }

        match isin.and_then(|isin| attributes.get(isin)) {
            Some(found) => out.extend(found.cells()),
            None => {
                log::info!("No attributes resolved for identifier {:?}", row[identifier_position]);
                out.extend(std::iter::repeat_n(Cell::Unresolved, ATTRIBUTE_LABELS.len()));
            }
        }
        merged.push_row(out);
    }
    Ok(merged)
}
