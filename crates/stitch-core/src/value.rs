#![forbid(unsafe_code)]

//! Dynamic values exchanged between controls, converters, and record slots.
//!
//! [`Value`] is the single currency of the binding engine: record slots hold
//! it, converters transform it, and control bindings translate it to and from
//! the control's native surface (text or checked state).
//!
//! # Invariants
//!
//! 1. Equality is *value* equality for scalars and text. Two distinct `Text`
//!    allocations with the same contents compare equal, so redundant writes
//!    are suppressed correctly.
//! 2. Actions and records compare by handle identity (`Rc::ptr_eq`).
//!    Rebinding a slot to a different closure counts as a change even when
//!    the closures behave identically.

use std::fmt;
use std::rc::Rc;

use crate::record::Record;

/// A zero-argument callback stored as a property value.
///
/// Action triggers look the current action up on every activation, so the
/// stored closure may be swapped at runtime.
pub type ActionFn = Rc<dyn Fn()>;

/// A dynamic value held in a record slot.
#[derive(Clone, Default)]
pub enum Value {
    /// Absent/none marker.
    #[default]
    Null,
    /// Boolean, the native surface of toggle controls.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Text, the native surface of text-input controls.
    Text(String),
    /// A zero-argument callback (action-trigger target).
    Action(ActionFn),
    /// A nested record, reachable through indirect storage.
    Record(Record),
}

impl Value {
    /// Wrap a closure as an action value.
    #[must_use]
    pub fn action(f: impl Fn() + 'static) -> Self {
        Self::Action(Rc::new(f))
    }

    /// True for `Null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Boolean payload, if this is a `Bool`.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer payload, if this is an `Int`.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Text payload, if this is a `Text`.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Action payload, if this is an `Action`.
    #[must_use]
    pub fn as_action(&self) -> Option<&ActionFn> {
        match self {
            Self::Action(f) => Some(f),
            _ => None,
        }
    }

    /// Record payload, if this is a `Record`.
    #[must_use]
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Boolean coercion used by toggle bindings and enablement predicates.
    ///
    /// `Null` is false; `Bool` is itself; `Int` is nonzero; `Text` is
    /// nonempty; actions and records are always true.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Text(s) => !s.is_empty(),
            Self::Action(_) | Self::Record(_) => true,
        }
    }

    /// Textual rendering used by text-input bindings.
    ///
    /// `Null` renders empty; actions and records render as opaque
    /// placeholders since they have no displayable state.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Text(s) => s.clone(),
            Self::Action(_) => "<action>".to_string(),
            Self::Record(_) => "<record>".to_string(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Action(a), Self::Action(b)) => Rc::ptr_eq(a, b),
            (Self::Record(a), Self::Record(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Int(i) => f.debug_tuple("Int").field(i).finish(),
            Self::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Self::Action(_) => f.write_str("Action(..)"),
            Self::Record(r) => f.debug_tuple("Record").field(r).finish(),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Self::Record(r)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
