//! The seam between the logbook and wherever readings are persisted.

use std::cell::RefCell;
use std::rc::Rc;

use crate::reading::RawReading;

/// Persistent collection of daily readings, keyed by date.
///
/// Implementations load and save the whole collection; `save_records` must be
/// atomic from the caller's point of view (a reader never sees half a write).
/// Record order is not significant.
pub trait RecordStore {
    fn get_records(&self) -> anyhow::Result<Vec<RawReading>>;
    fn save_records(&self, records: &[RawReading]) -> anyhow::Result<()>;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn get_records(&self) -> anyhow::Result<Vec<RawReading>> {
        (**self).get_records()
    }

    fn save_records(&self, records: &[RawReading]) -> anyhow::Result<()> {
        (**self).save_records(records)
    }
}

/// Volatile store backed by a shared vector.
///
/// Cheaply cloneable; clones see the same records.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Rc<RefCell<Vec<RawReading>>>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    pub fn with_records(records: Vec<RawReading>) -> MemoryStore {
        MemoryStore {
            records: Rc::new(RefCell::new(records)),
        }
    }
}

impl RecordStore for MemoryStore {
    fn get_records(&self) -> anyhow::Result<Vec<RawReading>> {
        Ok(self.records.borrow().clone())
    }

    fn save_records(&self, records: &[RawReading]) -> anyhow::Result<()> {
        *self.records.borrow_mut() = records.to_vec();
        Ok(())
    }
}
