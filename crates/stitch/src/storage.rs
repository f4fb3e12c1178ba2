#![forbid(unsafe_code)]

//! Storage locators: where a property's value physically lives.
//!
//! A locator is a stateless description of a slot: it holds names, not
//! values, and resolves them against an owner record on every access. No
//! notification logic lives here; locators do raw reads and writes only.
//!
//! # Invariants
//!
//! 1. A locator never caches anything about a particular owner; the same
//!    locator serves every instance of a view-model type.
//! 2. [`EventStorage`] creates an owner's subscriber set lazily on
//!    [`EventStorage::ensure`] and never clears it proactively; subscriber
//!    lifetime belongs to the `Subscription` guards, not to the locator.

use std::fmt;

use stitch_core::record::{FieldError, Record};
use stitch_core::subscribe::SubscriberSet;
use stitch_core::value::Value;

/// Where a property's value physically lives.
///
/// `field()` names the primary slot; it keys the default event storage for
/// notifying properties.
pub trait Storage: fmt::Debug {
    /// The primary slot name this locator resolves.
    fn field(&self) -> &str;

    /// Read the raw stored value.
    fn get(&self, owner: &Record) -> Result<Value, FieldError>;

    /// Write the raw stored value.
    fn set(&self, owner: &Record, value: Value) -> Result<(), FieldError>;

    /// Remove the stored value.
    fn remove(&self, owner: &Record) -> Result<(), FieldError>;
}

/// A slot directly on the owner.
#[derive(Debug, Clone)]
pub struct LocalField {
    field: String,
}

impl LocalField {
    /// Locate slot `field` on the owner itself.
    #[must_use]
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }
}

impl Storage for LocalField {
    fn field(&self) -> &str {
        &self.field
    }

    fn get(&self, owner: &Record) -> Result<Value, FieldError> {
        owner.get(&self.field)
    }

    fn set(&self, owner: &Record, value: Value) -> Result<(), FieldError> {
        owner.set(self.field.clone(), value);
        Ok(())
    }

    fn remove(&self, owner: &Record) -> Result<(), FieldError> {
        owner.remove(&self.field).map(drop)
    }
}

/// A slot on a record one reference away: `owner.reference.field`.
#[derive(Debug, Clone)]
pub struct IndirectField {
    field: String,
    reference: String,
}

impl IndirectField {
    /// Locate slot `field` on the record held in the owner's `reference`
    /// slot.
    #[must_use]
    pub fn new(field: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reference: reference.into(),
        }
    }

    fn resolve(&self, owner: &Record) -> Result<Record, FieldError> {
        let value = owner
            .get(&self.reference)
            .map_err(|_| FieldError::MissingReference {
                reference: self.reference.clone(),
            })?;
        match value {
            Value::Record(record) => Ok(record),
            _ => Err(FieldError::NotARecord {
                reference: self.reference.clone(),
            }),
        }
    }
}

impl Storage for IndirectField {
    fn field(&self) -> &str {
        &self.field
    }

    fn get(&self, owner: &Record) -> Result<Value, FieldError> {
        self.resolve(owner)?.get(&self.field)
    }

    fn set(&self, owner: &Record, value: Value) -> Result<(), FieldError> {
        let target = self.resolve(owner)?;
        target.set(self.field.clone(), value);
        Ok(())
    }

    fn remove(&self, owner: &Record) -> Result<(), FieldError> {
        self.resolve(owner)?.remove(&self.field).map(drop)
    }
}

/// Locator for a property's per-owner subscriber set.
///
/// Physically backed by the owner's subscriber side table, keyed by the
/// property's field name so distinct notifying properties never share a set.
#[derive(Debug, Clone)]
pub struct EventStorage {
    key: String,
}

impl EventStorage {
    /// Event storage under `key` (conventionally the property's field name).
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// The side-table key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The owner's subscriber set, if any subscribe ever created it.
    #[must_use]
    pub fn get(&self, owner: &Record) -> Option<SubscriberSet> {
        owner.subscribers(&self.key)
    }

    /// The owner's subscriber set, created empty on first use.
    #[must_use]
    pub fn ensure(&self, owner: &Record) -> SubscriberSet {
        owner.subscribers_or_default(&self.key)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
