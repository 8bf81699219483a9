use std::fmt::Debug;

use chrono::prelude::*;

pub type Timestamp = DateTime<Utc>;

pub trait Clock: Debug {
    fn now(&self) -> Timestamp;
}

/// Wall clock in UTC.
#[derive(Debug, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

#[cfg(test)]
pub use fake::*;

#[cfg(test)]
mod fake {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::{Clock, Timestamp};

    /// Clock stopped at a settable instant. Clones share the instant.
    #[derive(Clone, Debug)]
    pub struct FixedClock(Rc<Cell<Timestamp>>);

    impl FixedClock {
        pub fn new(at: Timestamp) -> Self {
            Self(Rc::new(Cell::new(at)))
        }

        pub fn set(&self, at: Timestamp) {
            self.0.set(at);
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> Timestamp {
            self.0.get()
        }
    }
}
