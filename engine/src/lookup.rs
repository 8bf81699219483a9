use std::collections::BTreeSet;

use chrono::Datelike;
use hashbrown::HashMap;

use crate::{cell::Cell, clock::Clock};

/// Labels of the attribute columns appended by [crate::merge::merge], in
/// order.
pub const ATTRIBUTE_LABELS: [&str; 5] = ["Value Number", "Name", "Value", "Country", "Currency"];

/// Attributes resolved for one identifier. `None` marks an attribute the
/// lookup could not provide.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Attributes {
    pub value_number: Option<String>,
    pub name: Option<String>,
    pub value: Option<String>,
    pub country: Option<String>,
    pub currency: Option<String>,
}

impl Attributes {
    /// Cells in [ATTRIBUTE_LABELS] order.
    pub fn cells(&self) -> [Cell; 5] {
        [
            self.value_number.clone().into(),
            self.name.clone().into(),
            self.value.clone().into(),
            self.country.clone().into(),
            self.currency.clone().into(),
        ]
    }
}

/// Attributes keyed by identifier.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IdentifierAttributes(HashMap<String, Attributes>);

impl IdentifierAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, identifier: String, attributes: Attributes) {
        self.0.insert(identifier, attributes);
    }

    pub fn get(&self, identifier: &str) -> Option<&Attributes> {
        self.0.get(identifier)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Attributes)> for IdentifierAttributes {
    fn from_iter<T: IntoIterator<Item = (String, Attributes)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Service resolving identifiers to their [Attributes] as of the end of a
/// given year.
///
/// Identifiers that cannot be resolved are left out of the result rather
/// than failing the whole batch.
pub trait IdentifierLookup {
    fn resolve(&mut self, identifiers: &BTreeSet<String>, as_of_year: i32) -> IdentifierAttributes;
}

/// Returns `requested`, or the year before the current one.
pub fn as_of_year(clock: &dyn Clock, requested: Option<i32>) -> i32 {
    requested.unwrap_or_else(|| clock.now().year() - 1)
}
