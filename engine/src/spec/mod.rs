//! Declarative table specifications.
//!
//! A specification is a YAML mapping of named sections. Each section is
//! either a mapping of output label to source column header (a rename
//! section), or a list of source column headers that must be present but are
//! not output (a filter section):
//!
//! ```yaml
//! holdings:
//!   isin: ISIN
//!   qty: Quantity
//!   note:            # Ignored, no output column.
//! layout:
//!   - Pos.
//!   - Description
//! ```


use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use hashbrown::HashSet;
use serde_yaml_ng::Value;

/// Errors from reading a malformed specification.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum SpecFormatError {
    #[error("specification is not well-formed YAML: {0}")]
    Malformed(String),
    #[error("specification is not a mapping of sections")]
    NotAMapping,
    #[error("specification contains no sections")]
    NoSections,
    #[error("section {section:?} is a {found}, expected a mapping or a list")]
    InvalidSection { section: String, found: &'static str },
    #[error("section {section:?} mixes mapping and list entries")]
    MixedSection { section: String },
    #[error("section {section:?} contains an invalid label: {label}")]
    InvalidLabel { section: String, label: String },
    #[error("section {section:?} requires column {label:?} more than once")]
    DuplicateLabel { section: String, label: String },
    #[error("section {section:?} requires no columns")]
    EmptySection { section: String },
}

/// Ordered collection of [Section]s, immutable once loaded.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Specification {
    sections: Vec<Section>,
}

impl Specification {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }
}

/// Grouping of required columns within a [Specification].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Section {
    Rename(RenameSection),
    Filter(FilterSection),
}

impl Section {
    pub fn name(&self) -> &str {
        match self {
            Section::Rename(section) => &section.name,
            Section::Filter(section) => &section.name,
        }
    }

    /// Source column headers that a table must have to qualify under this
    /// section.
    pub fn required_labels(&self) -> Vec<&str> {
        match self {
            Section::Rename(section) => section.outputs().map(|(_, source)| source).collect(),
            Section::Filter(section) => section.required.iter().map(String::as_str).collect(),
        }
    }
}

/// Renames source columns to output columns, in declaration order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RenameSection {
    pub name: String,
    pub columns: Vec<RenameColumn>,
}

impl RenameSection {
    /// Iterates over `(output, source)` label pairs that produce an output
    /// column, in declaration order.
    pub fn outputs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns.iter().filter_map(|column| {
            column
                .source
                .as_deref()
                .map(|source| (column.output.as_str(), source))
        })
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RenameColumn {
    pub output: String,
    /// `None` when the entry is declared without a source, which produces no
    /// output column.
    pub source: Option<String>,
}

/// Requires source columns to be present, without outputting them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FilterSection {
    pub name: String,
    pub required: Vec<String>,
}

/// Loads the specification from the YAML file at `path`.
pub fn load(path: &Path) -> Result<Specification> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("reading specification file {path:?}"))?;
    let spec =
        load_str(&source).with_context(|| format!("parsing specification file {path:?}"))?;
    log::debug!("Specification read from {path:?}: {spec:?}");
    Ok(spec)
}

/// Parses a specification from YAML text.
pub fn load_str(source: &str) -> std::result::Result<Specification, SpecFormatError> {
    let document: Value =
        serde_yaml_ng::from_str(source).map_err(|err| SpecFormatError::Malformed(err.to_string()))?;

    let Value::Mapping(mapping) = document else {
        return Err(SpecFormatError::NotAMapping);
    };

    let mut sections = Vec::with_capacity(mapping.len());
    for (key, value) in &mapping {
        let name = scalar_label(key).ok_or(SpecFormatError::NotAMapping)?;
        sections.push(parse_section(name, value)?);
    }

    if sections.is_empty() {
        return Err(SpecFormatError::NoSections);
    }

    Ok(Specification::new(sections))
}

/// Lists the specification files in `directory`, sorted by file name and
/// numbered from 1.
pub fn list(directory: &Path) -> Result<Vec<(usize, PathBuf)>> {
    let entries = std::fs::read_dir(directory)
        .with_context(|| format!("listing specification directory {directory:?}"))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("reading entry in directory {directory:?}"))?;
        let path = entry.path();
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == "yaml" || ext == "yml");
        if is_yaml && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    log::info!(
        "There are {} available specification files in {directory:?}",
        paths.len()
    );

    Ok(paths
        .into_iter()
        .enumerate()
        .map(|(index, path)| (index + 1, path))
        .collect())
}

fn parse_section(name: String, value: &Value) -> std::result::Result<Section, SpecFormatError> {
    let section = match value {
        Value::Mapping(mapping) => {
            let mut columns = Vec::with_capacity(mapping.len());
            for (output, source) in mapping {
                let output = scalar_label(output)
                    .filter(|label| !label.is_empty())
                    .ok_or_else(|| SpecFormatError::InvalidLabel {
                        section: name.clone(),
                        label: format!("<{}>", value_kind(output)),
                    })?;
                let source = match source {
                    Value::Null => None,
                    Value::Sequence(_) | Value::Mapping(_) => {
                        return Err(SpecFormatError::MixedSection { section: name });
                    }
                    other => Some(scalar_label(other).ok_or_else(|| {
                        SpecFormatError::InvalidLabel {
                            section: name.clone(),
                            label: format!("<{}>", value_kind(other)),
                        }
                    })?),
                };
                columns.push(RenameColumn {
                    output,
                    source: source.filter(|source| !source.is_empty()),
                });
            }
            Section::Rename(RenameSection { name, columns })
        }
        Value::Sequence(items) => {
            let mut required = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::Sequence(_) | Value::Mapping(_) => {
                        return Err(SpecFormatError::MixedSection { section: name });
                    }
                    other => required.push(
                        scalar_label(other)
                            .filter(|label| !label.is_empty())
                            .ok_or_else(|| SpecFormatError::InvalidLabel {
                                section: name.clone(),
                                label: format!("<{}>", value_kind(other)),
                            })?,
                    ),
                }
            }
            Section::Filter(FilterSection { name, required })
        }
        other => {
            return Err(SpecFormatError::InvalidSection {
                section: name,
                found: value_kind(other),
            });
        }
    };

    check_required_labels(&section)?;
    Ok(section)
}

fn check_required_labels(section: &Section) -> std::result::Result<(), SpecFormatError> {
    let required = section.required_labels();
    if required.is_empty() {
        return Err(SpecFormatError::EmptySection {
            section: section.name().to_owned(),
        });
    }

    let mut seen = HashSet::with_capacity(required.len());
    for label in required {
        if !seen.insert(label) {
            return Err(SpecFormatError::DuplicateLabel {
                section: section.name().to_owned(),
                label: label.to_owned(),
            });
        }
    }
    Ok(())
}

/// Column headers may be written unquoted in YAML, so numbers are accepted as
/// labels too.
fn scalar_label(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
