//! Identifier lookup against external securities services.

pub mod ictax;

/// Lookup event emitted to track progress.
#[derive(Debug, Eq, PartialEq)]
pub enum LookupEvent {
    /// Indicates that a single identifier has been looked up, successfully
    /// or not.
    Progress {
        identifier: String,
        resolved: bool,
        completed: usize,
        total: usize,
    },
    /// Indicates that all identifiers have been looked up and that no more
    /// events will follow.
    Completed,
}

/// Trait to implement to receive notifications about lookup progress.
pub trait LookupEvents {
    fn on_event(&mut self, event: LookupEvent);
}

/// Discards all events.
#[derive(Debug, Default)]
pub struct NoEvents;

impl LookupEvents for NoEvents {
    fn on_event(&mut self, _event: LookupEvent) {}
}
