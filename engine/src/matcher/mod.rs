#[cfg(test)]
mod tests;

use std::collections::BTreeSet;

use hashbrown::HashSet;

use crate::{
    spec::{Section, Specification},
    table::RawTable,
};

/// Outcome of matching a [RawTable] against a [Specification].
#[derive(Debug, Eq, PartialEq)]
pub struct MatchResult<'s> {
    /// Labels required by any section of the specification that are present
    /// in the table's header.
    pub present_labels: BTreeSet<&'s str>,
    /// Sections whose every required label is present, in declaration order.
    pub sections: Vec<&'s Section>,
}

impl MatchResult<'_> {
    /// Whether the table satisfies at least one section in full.
    pub fn qualifies(&self) -> bool {
        !self.sections.is_empty()
    }
}

/// Determines which sections of `spec` the `table` satisfies.
///
/// Header comparison is exact and case sensitive. Headers not mentioned by a
/// section are ignored.
pub fn match_table<'s>(table: &RawTable, spec: &'s Specification) -> MatchResult<'s> {
    let headers: HashSet<&str> = table.header.iter().map(String::as_str).collect();

    let mut present_labels = BTreeSet::new();
    let mut sections = Vec::new();
    for section in spec.sections() {
        let mut satisfied = true;
        for label in section.required_labels() {
            if headers.contains(label) {
                present_labels.insert(label);
            } else {
                satisfied = false;
            }
        }
        if satisfied {
            sections.push(section);
        }
    }

    MatchResult {
        present_labels,
        sections,
    }
}
