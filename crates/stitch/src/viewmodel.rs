#![forbid(unsafe_code)]

//! Named property tables and the view-model handle the resolver binds to.
//!
//! Property descriptors belong to a view-model *type*, slot values to an
//! *instance*: a [`PropertyTable`] is the shared per-type descriptor map,
//! a [`ViewModel`] pairs one table with one [`Record`] instance. Cloning a
//! `ViewModel` clones two handles, so bindings capture it freely.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use stitch_core::record::Record;
use stitch_core::subscribe::Subscription;
use stitch_core::value::Value;

use crate::property::{Property, PropertyError};

/// Shared name-to-property map for a view-model type.
#[derive(Debug, Default)]
pub struct PropertyTable {
    entries: HashMap<String, Rc<Property>>,
}

impl PropertyTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a property under `name`, replacing any previous entry.
    pub fn insert(&mut self, name: impl Into<String>, property: Property) {
        self.entries.insert(name.into(), Rc::new(property));
    }

    /// Look up a property by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Rc<Property>> {
        self.entries.get(name)
    }

    /// Whether a property exists under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Iterate over all property names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One owner instance plus its property table.
///
/// Cloning creates a new handle to the **same** record and table.
#[derive(Clone)]
pub struct ViewModel {
    record: Record,
    properties: Rc<PropertyTable>,
}

impl ViewModel {
    /// Pair a record instance with its property table.
    #[must_use]
    pub fn new(record: Record, properties: PropertyTable) -> Self {
        Self {
            record,
            properties: Rc::new(properties),
        }
    }

    /// The owner record.
    #[must_use]
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Look up a property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<Rc<Property>> {
        self.properties.get(name).map(Rc::clone)
    }

    fn require(&self, name: &str) -> Result<Rc<Property>, PropertyError> {
        self.property(name)
            .ok_or_else(|| PropertyError::UnknownProperty {
                name: name.to_string(),
            })
    }

    /// Read property `name` on this instance.
    pub fn get(&self, name: &str) -> Result<Value, PropertyError> {
        self.require(name)?.get(&self.record)
    }

    /// Write property `name` on this instance.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<(), PropertyError> {
        self.require(name)?.set(&self.record, value.into())
    }

    /// Remove property `name`'s stored value on this instance.
    pub fn remove(&self, name: &str) -> Result<(), PropertyError> {
        self.require(name)?.remove(&self.record)
    }

    /// Manually fire change notification for property `name`.
    pub fn notify(&self, name: &str) -> Result<(), PropertyError> {
        self.require(name)?.notify(&self.record);
        Ok(())
    }

    /// Subscribe to property `name` on this instance.
    ///
    /// # Panics
    ///
    /// Panics if the property has no event storage (see
    /// [`Property::subscribe`]).
    pub fn subscribe(
        &self,
        name: &str,
        callback: impl Fn() + 'static,
    ) -> Result<Subscription, PropertyError> {
        Ok(self.require(name)?.subscribe(&self.record, callback))
    }

    /// Whether property `name` is currently enabled. Unknown names are
    /// enabled, consistent with the fail-open enablement policy.
    #[must_use]
    pub fn is_enabled(&self, name: &str) -> bool {
        self.property(name)
            .is_none_or(|property| property.is_enabled(&self.record))
    }
}

impl fmt::Debug for ViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.properties.names().collect();
        names.sort_unstable();
        f.debug_struct("ViewModel")
            .field("record", &self.record)
            .field("properties", &names)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn sample() -> ViewModel {
        let record = Record::new();
        record.set("_text", Value::from("initial"));

        let mut table = PropertyTable::new();
        table.insert("text", Property::local("_text").notifying());
        ViewModel::new(record, table)
    }

    #[test]
    fn named_access_roundtrip() {
        let vm = sample();
        assert_eq!(vm.get("text").unwrap(), Value::from("initial"));
        vm.set("text", "changed").unwrap();
        assert_eq!(vm.get("text").unwrap(), Value::from("changed"));
        assert_eq!(vm.record().get("_text").unwrap(), Value::from("changed"));
    }

    #[test]
    fn unknown_property_errors() {
        let vm = sample();
        assert_eq!(
            vm.get("nope").unwrap_err(),
            PropertyError::UnknownProperty {
                name: "nope".to_string()
            }
        );
        assert!(vm.set("nope", Value::Null).is_err());
        assert!(vm.notify("nope").is_err());
    }

    #[test]
    fn subscribe_and_manual_notify() {
        let vm = sample();
        let count = Rc::new(Cell::new(0u32));
        let count_clone = Rc::clone(&count);
        let _sub = vm
            .subscribe("text", move || count_clone.set(count_clone.get() + 1))
            .unwrap();

        vm.notify("text").unwrap();
        vm.set("text", "next").unwrap();
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn unknown_property_is_enabled() {
        let vm = sample();
        assert!(vm.is_enabled("text"));
        assert!(vm.is_enabled("nope"));
    }

    #[test]
    fn clone_shares_instance_state() {
        let vm = sample();
        let alias = vm.clone();
        alias.set("text", "via alias").unwrap();
        assert_eq!(vm.get("text").unwrap(), Value::from("via alias"));
    }
}
