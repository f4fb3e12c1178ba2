#![forbid(unsafe_code)]

//! Core: the value model, dynamic records, and the control boundary.
//!
//! # Role in Stitch
//! `stitch-core` is the boundary layer. It owns the dynamic [`Value`] type,
//! the [`Record`] owner objects that properties store into, the weak
//! subscriber machinery, and the control traits a host toolkit implements.
//!
//! # Primary responsibilities
//! - **Value**: the dynamic currency of slots, converters, and controls.
//! - **Record**: named slots plus per-property subscriber storage.
//! - **SubscriberSet/Subscription**: weakly-held callbacks with RAII
//!   unsubscribe.
//! - **Control traits**: the narrow interface the binding engine requires
//!   from any widget tree.
//!
//! # How it fits in the system
//! The engine (`stitch`) consumes records through storage locators and views
//! through [`control::Control`] handles. Neither side knows the other's
//! internals; this crate is the clean bridge between them.

pub mod control;
pub mod record;
pub mod subscribe;
pub mod value;

pub use control::{
    ActionTrigger, Control, ControlHandle, ListenerHandle, TextInput, ToggleSwitch, descendants,
};
pub use record::{FieldError, Record};
pub use subscribe::{SubscriberSet, Subscription};
pub use value::{ActionFn, Value};
