#![forbid(unsafe_code)]

//! Observable properties: storage, conversion, and change notification.
//!
//! # Design
//!
//! A [`Property`] is a descriptor, not a value: it describes where a logical
//! field lives (a [`Storage`] locator), how view values translate to stored
//! values and back (read/show converters), whether changes notify
//! subscribers (an optional [`EventStorage`]), and when the bound control
//! should accept interaction (an enablement predicate). One property serves
//! every owner instance; all per-owner state lives on the owner's record.
//!
//! # Invariants
//!
//! 1. `set` with a value whose converted form equals the current stored
//!    value (by [`Value`] equality) performs no write and fires no
//!    notification.
//! 2. `remove` always notifies; there is no previous value left to compare.
//! 3. Converter errors propagate to the caller unmodified; only enablement
//!    predicate errors are swallowed (fail-open, the view must not brick on
//!    a buggy predicate).
//! 4. Notification snapshots the live subscriber list before invoking any
//!    callback, so subscribers may set this or another property re-entrantly.
//!
//! # Failure Modes
//!
//! - **Subscribe without event storage**: a configuration bug; panics
//!   immediately rather than silently dropping the callback.
//! - **Notification cycles**: two properties notifying each other through
//!   always-changing converters will recurse until stack overflow; the
//!   equality check in `set` breaks well-behaved cycles, anything else is
//!   the caller's design to avoid.

use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use stitch_core::record::{FieldError, Record};
use stitch_core::subscribe::Subscription;
use stitch_core::value::Value;

use crate::convert::ConvertError;
use crate::storage::{EventStorage, IndirectField, LocalField, Storage};

/// Plain value converter (no owner access).
pub type Converter = Rc<dyn Fn(Value) -> Result<Value, ConvertError>>;

/// Owner-aware converter; takes precedence over the plain converter.
pub type OwnerConverter = Rc<dyn Fn(&Record, Value) -> Result<Value, ConvertError>>;

/// Enablement predicate for the bound control.
pub type EnabledPredicate = Rc<dyn Fn(&Record) -> Result<bool, PropertyError>>;

/// Errors from property access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyError {
    /// The storage locator could not resolve its slot.
    Field(FieldError),
    /// A read or show converter rejected the value.
    Convert(ConvertError),
    /// A named lookup found no property (see
    /// [`ViewModel`](crate::ViewModel)).
    UnknownProperty { name: String },
}

impl fmt::Display for PropertyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(err) => write!(f, "{err}"),
            Self::Convert(err) => write!(f, "{err}"),
            Self::UnknownProperty { name } => write!(f, "no property '{name}'"),
        }
    }
}

impl std::error::Error for PropertyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Field(err) => Some(err),
            Self::Convert(err) => Some(err),
            Self::UnknownProperty { .. } => None,
        }
    }
}

impl From<FieldError> for PropertyError {
    fn from(err: FieldError) -> Self {
        Self::Field(err)
    }
}

impl From<ConvertError> for PropertyError {
    fn from(err: ConvertError) -> Self {
        Self::Convert(err)
    }
}

/// An observable property descriptor.
///
/// Built with [`Property::local`] / [`Property::indirect`] /
/// [`Property::new`] and the fluent configuration methods, then enriched
/// with `attach_*` callbacks before being inserted into a
/// [`PropertyTable`](crate::PropertyTable).
pub struct Property {
    storage: Box<dyn Storage>,
    events: Option<EventStorage>,
    read: Option<Converter>,
    show: Option<Converter>,
    read_with: Option<OwnerConverter>,
    show_with: Option<OwnerConverter>,
    enabled: Option<EnabledPredicate>,
}

impl Property {
    /// A property over an explicit storage locator.
    #[must_use]
    pub fn new(storage: Box<dyn Storage>) -> Self {
        Self {
            storage,
            events: None,
            read: None,
            show: None,
            read_with: None,
            show_with: None,
            enabled: None,
        }
    }

    /// A property backed by slot `field` on the owner itself.
    #[must_use]
    pub fn local(field: impl Into<String>) -> Self {
        Self::new(Box::new(LocalField::new(field)))
    }

    /// A property backed by `owner.reference.field`.
    #[must_use]
    pub fn indirect(field: impl Into<String>, reference: impl Into<String>) -> Self {
        Self::new(Box::new(IndirectField::new(field, reference)))
    }

    /// Enable change notification, with event storage keyed by the
    /// storage locator's field name.
    #[must_use]
    pub fn notifying(self) -> Self {
        let key = self.storage.field().to_string();
        self.with_event_storage(EventStorage::new(key))
    }

    /// Enable change notification with explicit event storage.
    #[must_use]
    pub fn with_event_storage(mut self, events: EventStorage) -> Self {
        self.events = Some(events);
        self
    }

    /// Set the read converter (view value to stored value).
    #[must_use]
    pub fn read(
        mut self,
        convert: impl Fn(Value) -> Result<Value, ConvertError> + 'static,
    ) -> Self {
        self.read = Some(Rc::new(convert));
        self
    }

    /// Set the show converter (stored value to view value).
    #[must_use]
    pub fn show(
        mut self,
        convert: impl Fn(Value) -> Result<Value, ConvertError> + 'static,
    ) -> Self {
        self.show = Some(Rc::new(convert));
        self
    }

    /// Attach an owner-aware read converter. Takes precedence over the
    /// plain read converter.
    pub fn attach_read(
        &mut self,
        convert: impl Fn(&Record, Value) -> Result<Value, ConvertError> + 'static,
    ) {
        self.read_with = Some(Rc::new(convert));
    }

    /// Attach an owner-aware show converter. Takes precedence over the
    /// plain show converter.
    pub fn attach_show(
        &mut self,
        convert: impl Fn(&Record, Value) -> Result<Value, ConvertError> + 'static,
    ) {
        self.show_with = Some(Rc::new(convert));
    }

    /// Attach an enablement predicate for the bound control.
    pub fn attach_enabled(
        &mut self,
        predicate: impl Fn(&Record) -> Result<bool, PropertyError> + 'static,
    ) {
        self.enabled = Some(Rc::new(predicate));
    }

    /// Whether this property supports change notification.
    #[must_use]
    pub fn is_notifying(&self) -> bool {
        self.events.is_some()
    }

    /// Read the property: raw storage value, show-converted.
    ///
    /// No side effects. Converter errors propagate.
    pub fn get(&self, owner: &Record) -> Result<Value, PropertyError> {
        let stored = self.storage.get(owner)?;
        if let Some(show) = &self.show_with {
            return Ok(show(owner, stored)?);
        }
        match &self.show {
            Some(show) => Ok(show(stored)?),
            None => Ok(stored),
        }
    }

    /// Write the property: read-convert, compare, store, notify.
    ///
    /// If the converted value equals the current stored value, nothing is
    /// written and no notification fires.
    pub fn set(&self, owner: &Record, value: Value) -> Result<(), PropertyError> {
        let next = if let Some(read) = &self.read_with {
            read(owner, value)?
        } else {
            match &self.read {
                Some(read) => read(value)?,
                None => value,
            }
        };
        let previous = self.storage.get(owner)?;
        if next == previous {
            trace!(field = self.storage.field(), "value unchanged, notification suppressed");
            return Ok(());
        }
        self.storage.set(owner, next)?;
        self.notify(owner);
        Ok(())
    }

    /// Remove the stored value and notify unconditionally.
    pub fn remove(&self, owner: &Record) -> Result<(), PropertyError> {
        self.storage.remove(owner)?;
        self.notify(owner);
        Ok(())
    }

    /// Invoke every live subscriber for this owner.
    ///
    /// Silent no-op when the property has no event storage or the owner has
    /// no subscribers. Dead subscribers are pruned first; callbacks run
    /// outside any interior borrow and may mutate properties re-entrantly.
    pub fn notify(&self, owner: &Record) {
        let Some(events) = &self.events else {
            return;
        };
        let Some(subscribers) = events.get(owner) else {
            return;
        };
        let live = subscribers.live();
        trace!(
            field = self.storage.field(),
            count = live.len(),
            "notifying subscribers"
        );
        for callback in live {
            callback();
        }
    }

    /// Subscribe to change notification for `owner`.
    ///
    /// The callback is weakly held: keep the returned guard alive for as
    /// long as the subscription should last.
    ///
    /// # Panics
    ///
    /// Panics if the property was built without event storage. Subscribing
    /// to a non-notifying property is a configuration bug, not a runtime
    /// condition.
    pub fn subscribe(&self, owner: &Record, callback: impl Fn() + 'static) -> Subscription {
        let events = self
            .events
            .as_ref()
            .expect("subscribe requires event storage; build the property with `notifying()`");
        events.ensure(owner).add(callback)
    }

    /// Whether the bound control should currently accept interaction.
    ///
    /// No predicate means enabled. A failing predicate is logged and
    /// treated as enabled; the view must not lock up over a buggy
    /// predicate.
    #[must_use]
    pub fn is_enabled(&self, owner: &Record) -> bool {
        let Some(predicate) = &self.enabled else {
            return true;
        };
        match predicate(owner) {
            Ok(enabled) => enabled,
            Err(err) => {
                debug!(
                    field = self.storage.field(),
                    %err,
                    "enablement predicate failed, treating as enabled"
                );
                true
            }
        }
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("storage", &self.storage)
            .field("events", &self.events)
            .field("has_read", &(self.read.is_some() || self.read_with.is_some()))
            .field("has_show", &(self.show.is_some() || self.show_with.is_some()))
            .field("has_enabled", &self.enabled.is_some())
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

    fn counter() -> (Rc<Cell<u32>>, impl Fn() + 'static) {
        let count = Rc::new(Cell::new(0u32));
        let count_clone = Rc::clone(&count);
        (count, move || count_clone.set(count_clone.get() + 1))
    }

    #[test]
    fn backing_field_roundtrip() {
        let owner = Record::new();
        owner.set("_foo", Value::Int(0));
        let foo = Property::local("_foo");

        foo.set(&owner, Value::Int(10)).unwrap();
        assert_eq!(foo.get(&owner).unwrap(), Value::Int(10));
        assert_eq!(owner.get("_foo").unwrap(), Value::Int(10));

        // Direct backing-field mutation bypasses the property entirely,
        // but reads still see it.
        owner.set("_foo", Value::Int(20));
        assert_eq!(foo.get(&owner).unwrap(), Value::Int(20));
    }

    #[test]
    fn constant_converters() {
        let owner = Record::new();
        owner.set("_foo", Value::from("initial"));
        let foo = Property::local("_foo")
            .show(|_| Ok(Value::from("show")))
            .read(|_| Ok(Value::from("read")));

        assert_eq!(foo.get(&owner).unwrap(), Value::from("show"));
        assert_eq!(owner.get("_foo").unwrap(), Value::from("initial"));

        foo.set(&owner, Value::from("written")).unwrap();
        assert_eq!(owner.get("_foo").unwrap(), Value::from("read"));
    }

    #[test]
    fn indirect_property_propagates_to_the_model() {
        let model = Record::new();
        model.set("foo", Value::from("initial"));
        let owner = Record::new();
        owner.set("_model", Value::from(model.clone()));

        let foo = Property::indirect("foo", "_model");
        assert_eq!(foo.get(&owner).unwrap(), Value::from("initial"));

        foo.set(&owner, Value::Int(20)).unwrap();
        assert_eq!(model.get("foo").unwrap(), Value::Int(20));
        assert_eq!(foo.get(&owner).unwrap(), Value::Int(20));
    }

    #[test]
    fn notify_set_and_remove_each_fire_once() {
        let owner = Record::new();
        owner.set("_foo", Value::Int(0));
        let foo = Property::local("_foo").notifying();

        // Notify with no subscribers is a no-op.
        foo.notify(&owner);

        let (count, bump) = counter();
        let _sub = foo.subscribe(&owner, bump);

        foo.notify(&owner);
        foo.set(&owner, Value::Int(123)).unwrap();
        foo.remove(&owner).unwrap();
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn equal_value_set_suppresses_notification() {
        let owner = Record::new();
        owner.set("_foo", Value::from("same"));
        let foo = Property::local("_foo").notifying();

        let (count, bump) = counter();
        let _sub = foo.subscribe(&owner, bump);

        // Equal-but-distinct text instance: still suppressed.
        foo.set(&owner, Value::Text("same".to_string())).unwrap();
        assert_eq!(count.get(), 0);

        foo.set(&owner, Value::from("different")).unwrap();
        assert_eq!(count.get(), 1);
    }

    #[test]
    #[should_panic(expected = "subscribe requires event storage")]
    fn subscribe_without_event_storage_panics() {
        let owner = Record::new();
        let foo = Property::local("_foo");
        let _sub = foo.subscribe(&owner, || {});
    }

    #[test]
    fn attached_enablement_receives_the_owner() {
        let owner = Record::new();
        let seen = Rc::new(Cell::new(false));
        let seen_clone = Rc::clone(&seen);
        let expected = owner.clone();

        let mut bar = Property::local("_bar");
        bar.attach_enabled(move |o| {
            seen_clone.set(o.ptr_eq(&expected));
            Ok(false)
        });

        assert!(!bar.is_enabled(&owner));
        assert!(seen.get());
    }

    #[test]
    fn enablement_fails_open() {
        let owner = Record::new();
        let mut bar = Property::local("_bar");
        bar.attach_enabled(|_| {
            Err(PropertyError::UnknownProperty {
                name: "broken".to_string(),
            })
        });
        assert!(bar.is_enabled(&owner));

        // No predicate at all is also enabled.
        assert!(Property::local("_baz").is_enabled(&owner));
    }

    #[test]
    fn owner_aware_converters_take_precedence() {
        let owner = Record::new();
        owner.set("_foo", Value::Int(10));
        owner.set("offset", Value::Int(100));

        let mut foo = Property::local("_foo")
            .show(|_| Ok(Value::from("plain-show")))
            .read(|_| Ok(Value::from("plain-read")));
        foo.attach_show(|o, value| {
            let offset = o.get("offset").map_err(|e| ConvertError::new(e.to_string()))?;
            match (offset, value) {
                (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a + b)),
                _ => Err(ConvertError::new("expected integers")),
            }
        });
        foo.attach_read(|_, value| Ok(value));

        assert_eq!(foo.get(&owner).unwrap(), Value::Int(110));
        foo.set(&owner, Value::Int(42)).unwrap();
        assert_eq!(owner.get("_foo").unwrap(), Value::Int(42));
    }

    #[test]
    fn converter_errors_propagate() {
        let owner = Record::new();
        owner.set("_foo", Value::Int(1));
        let foo = Property::local("_foo").read(|_| Err(ConvertError::new("nope")));

        let err = foo.set(&owner, Value::Int(2)).unwrap_err();
        assert!(matches!(err, PropertyError::Convert(_)));
        // Storage untouched.
        assert_eq!(owner.get("_foo").unwrap(), Value::Int(1));
    }

    #[test]
    fn set_on_absent_backing_field_errors() {
        let owner = Record::new();
        let foo = Property::local("_foo");
        assert!(matches!(
            foo.set(&owner, Value::Int(1)),
            Err(PropertyError::Field(FieldError::Missing { .. }))
        ));
    }

    #[test]
    fn dropped_subscription_stops_notifications() {
        let owner = Record::new();
        owner.set("_foo", Value::Int(0));
        let foo = Property::local("_foo").notifying();

        let (count, bump) = counter();
        let sub = foo.subscribe(&owner, bump);

        foo.set(&owner, Value::Int(1)).unwrap();
        assert_eq!(count.get(), 1);

        drop(sub);
        foo.set(&owner, Value::Int(2)).unwrap();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn subscribers_are_per_owner() {
        let first = Record::new();
        first.set("_foo", Value::Int(0));
        let second = Record::new();
        second.set("_foo", Value::Int(0));
        let foo = Property::local("_foo").notifying();

        let (count, bump) = counter();
        let _sub = foo.subscribe(&first, bump);

        foo.set(&second, Value::Int(9)).unwrap();
        assert_eq!(count.get(), 0);
        foo.set(&first, Value::Int(9)).unwrap();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn reentrant_notification_is_tolerated() {
        let owner = Record::new();
        owner.set("_foo", Value::Int(0));
        owner.set("_bar", Value::Int(0));
        let foo = Rc::new(Property::local("_foo").notifying());
        let bar = Rc::new(Property::local("_bar").notifying());

        // foo's subscriber pushes the new value into bar.
        let chain_owner = owner.clone();
        let chain_bar = Rc::clone(&bar);
        let chain_foo = Rc::clone(&foo);
        let _chain = foo.subscribe(&owner, move || {
            let value = chain_foo.get(&chain_owner).unwrap();
            chain_bar.set(&chain_owner, value).unwrap();
        });

        let (count, bump) = counter();
        let _sub = bar.subscribe(&owner, bump);

        foo.set(&owner, Value::Int(7)).unwrap();
        assert_eq!(owner.get("_bar").unwrap(), Value::Int(7));
        assert_eq!(count.get(), 1);
    }
}
