use std::fmt::{self, Display};

/// Text rendered for [Cell::Unresolved].
pub const UNRESOLVED_MARKER: &str = "#N/A";

/// A single value within a [crate::dataset::Dataset].
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    /// The source table had no column for this position.
    Absent,
    /// An attribute lookup produced no value for the row's identifier.
    Unresolved,
    Text(String),
    Integer(i64),
    Decimal(f64),
}

impl Cell {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Cell::Absent)
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Absent => Ok(()),
            Cell::Unresolved => f.write_str(UNRESOLVED_MARKER),
            Cell::Text(text) => f.write_str(text),
            Cell::Integer(value) => write!(f, "{value}"),
            Cell::Decimal(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_owned())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Integer(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Decimal(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Unresolved)
    }
}
