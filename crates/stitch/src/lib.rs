#![forbid(unsafe_code)]

//! Stitch: an MVVM two-way data-binding micro-framework.
//!
//! The engine has three layers, leaves first:
//!
//! - [`storage`]: locators describing where a property's value physically
//!   lives: a local slot, a slot one reference away, or a per-owner
//!   subscriber set.
//! - [`property`]: the observable-property descriptor combining storage,
//!   read/show conversion, change notification, and enablement.
//! - [`resolver`]: walks a view's control tree, matches control names to
//!   property names, and wires per-control-kind two-way synchronization.
//!
//! The host toolkit is out of scope: controls enter the engine only through
//! the trait boundary in [`stitch_core::control`], re-exported as [`core`].
//!
//! # Example
//!
//! ```
//! use stitch::{Property, PropertyTable, ViewModel};
//! use stitch::core::{Record, Value};
//!
//! let record = Record::new();
//! record.set("_text", Value::from("initial"));
//!
//! let mut table = PropertyTable::new();
//! table.insert("text", Property::local("_text").notifying());
//!
//! let model = ViewModel::new(record, table);
//! let _sub = model.subscribe("text", || println!("text changed")).unwrap();
//! model.set("text", "changed").unwrap();
//! ```

pub mod convert;
pub mod property;
pub mod resolver;
pub mod storage;
pub mod viewmodel;

/// Boundary types shared with host toolkits.
pub use stitch_core as core;

pub use convert::ConvertError;
pub use property::{Property, PropertyError};
pub use resolver::{BindError, bind, bind_all, effective_name};
pub use storage::{EventStorage, IndirectField, LocalField, Storage};
pub use viewmodel::{PropertyTable, ViewModel};

/// Common imports for binding-engine users.
pub mod prelude {
    pub use crate::convert;
    pub use crate::property::{Property, PropertyError};
    pub use crate::resolver::{BindError, bind, bind_all};
    pub use crate::storage::{EventStorage, IndirectField, LocalField, Storage};
    pub use crate::viewmodel::{PropertyTable, ViewModel};
    pub use stitch_core::control::{Control, ControlHandle};
    pub use stitch_core::record::Record;
    pub use stitch_core::subscribe::Subscription;
    pub use stitch_core::value::Value;
}
