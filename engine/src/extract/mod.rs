
use crate::{
    combine::combine,
    dataset::CombinedDataset,
    lookup::{IdentifierAttributes, IdentifierLookup},
    matcher::match_table,
    merge::{MissingIdentifierColumnError, identifiers, merge},
    numeric::NumberFormat,
    project::project_matches,
    spec::Specification,
    table::RawTable,
};

/// Matches, projects and combines `tables` into one dataset.
///
/// Tables qualifying under no section are skipped.
pub fn extract_tables(tables: &[RawTable], spec: &Specification) -> CombinedDataset {
    let projected = tables.iter().enumerate().filter_map(|(index, table)| {
        let matched = match_table(table, spec);
        let projection = project_matches(table, &matched);
        if projection.is_some() {
            let names: Vec<&str> = matched.sections.iter().map(|section| section.name()).collect();
            log::info!(
                "Table #{index} ({} rows) matched sections {names:?}",
                table.rows.len()
            );
        } else {
            log::debug!("Skipping table #{index} with header {:?}", table.header);
        }
        projection
    });
    combine(projected)
}

/// Settings for [extract_funds].
#[derive(Clone, Copy, Debug)]
pub struct FundOptions {
    pub number_format: NumberFormat,
    pub as_of_year: i32,
}

/// Extracts `tables` as [extract_tables] does, then merges in the attributes
/// resolved by `lookup` for each identifier.
///
/// Without a `lookup`, every attribute is unresolved.
pub fn extract_funds(
    tables: &[RawTable],
    spec: &Specification,
    lookup: Option<&mut dyn IdentifierLookup>,
    options: &FundOptions,
) -> Result<CombinedDataset, MissingIdentifierColumnError> {
    let combined = extract_tables(tables, spec);
    let identifiers = identifiers(&combined)?;

    let attributes = match lookup {
        Some(lookup) => {
            log::info!(
                "Looking up {} identifiers as of {}",
                identifiers.len(),
                options.as_of_year
            );
            lookup.resolve(&identifiers, options.as_of_year)
        }
        None => IdentifierAttributes::new(),
    };
    log::info!(
        "Resolved {} of {} identifiers",
        attributes.len(),
        identifiers.len()
    );

    merge(&combined, &attributes, &options.number_format)
}
