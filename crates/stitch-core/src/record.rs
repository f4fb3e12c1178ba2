#![forbid(unsafe_code)]

//! Dynamic owner objects: named value slots plus per-property subscriber
//! storage.
//!
//! # Design
//!
//! A [`Record`] is a cheaply-cloneable handle (`Rc` interior) to a mutable
//! slot map. Storage locators resolve slot names against a record at access
//! time; the record itself knows nothing about properties, conversion, or
//! notification. Subscriber sets live in a separate side table keyed by
//! property name, so event storage never collides with value slots.
//!
//! # Invariants
//!
//! 1. `get` and `remove` on an absent slot fail with
//!    [`FieldError::Missing`]; `set` always succeeds.
//! 2. Slot borrows are released before any method returns, so callers may
//!    freely interleave reads, writes, and notification callbacks.
//! 3. Cloning a record clones the handle, never the slots: all clones see
//!    the same state.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::subscribe::SubscriberSet;
use crate::value::Value;

/// Errors from resolving a named slot on a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The named slot does not exist on the owner.
    Missing { field: String },
    /// An indirect locator's reference slot does not exist on the owner.
    MissingReference { reference: String },
    /// An indirect locator's reference slot holds a non-record value.
    NotARecord { reference: String },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { field } => write!(f, "no field '{field}'"),
            Self::MissingReference { reference } => {
                write!(f, "missing reference '{reference}'")
            }
            Self::NotARecord { reference } => {
                write!(f, "reference '{reference}' does not hold a record")
            }
        }
    }
}

impl std::error::Error for FieldError {}

#[derive(Default)]
struct RecordInner {
    slots: RefCell<HashMap<String, Value>>,
    /// Subscriber sets keyed by event-storage name, one per notifying
    /// property that has seen a subscribe on this owner.
    subscribers: RefCell<HashMap<String, SubscriberSet>>,
}

/// A dynamic object with named slots, used as the owner of bound properties.
///
/// Cloning creates a new handle to the **same** slots.
#[derive(Default)]
pub struct Record {
    inner: Rc<RecordInner>,
}

// Manual Clone: shares the same Rc.
impl Clone for Record {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl Record {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a slot. Fails if the slot is absent.
    pub fn get(&self, field: &str) -> Result<Value, FieldError> {
        self.inner
            .slots
            .borrow()
            .get(field)
            .cloned()
            .ok_or_else(|| FieldError::Missing {
                field: field.to_string(),
            })
    }

    /// Write a slot, creating it if absent.
    pub fn set(&self, field: impl Into<String>, value: Value) {
        self.inner.slots.borrow_mut().insert(field.into(), value);
    }

    /// Remove a slot, returning its value. Fails if the slot is absent.
    pub fn remove(&self, field: &str) -> Result<Value, FieldError> {
        self.inner
            .slots
            .borrow_mut()
            .remove(field)
            .ok_or_else(|| FieldError::Missing {
                field: field.to_string(),
            })
    }

    /// Whether a slot exists.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.inner.slots.borrow().contains_key(field)
    }

    /// The subscriber set for an event-storage key, if one was ever created.
    #[must_use]
    pub fn subscribers(&self, key: &str) -> Option<SubscriberSet> {
        self.inner.subscribers.borrow().get(key).cloned()
    }

    /// The subscriber set for an event-storage key, lazily created empty.
    #[must_use]
    pub fn subscribers_or_default(&self, key: &str) -> SubscriberSet {
        self.inner
            .subscribers
            .borrow_mut()
            .entry(key.to_string())
            .or_default()
            .clone()
    }

    /// Whether two handles refer to the same record.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots = self.inner.slots.borrow();
        let mut names: Vec<&str> = slots.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Record")
            .field("slots", &names)
            .field("subscriber_keys", &self.inner.subscribers.borrow().len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
