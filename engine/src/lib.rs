//! Table specification matching, projection and identifier-keyed merging
//! for tables extracted from financial documents.

pub mod cell;
pub mod clock;
pub mod columns;
pub mod combine;
pub mod dataset;
pub mod extract;
pub mod identifier;
pub mod lookup;
pub mod matcher;
pub mod merge;
pub mod numeric;
pub mod project;
pub mod spec;
pub mod table;
