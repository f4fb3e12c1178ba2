#![forbid(unsafe_code)]

//! The binding resolver: matches named controls to named properties and
//! wires two-way synchronization per control kind.
//!
//! # Design
//!
//! [`bind_all`] walks every descendant of a view root in pre-order and binds
//! each control whose (effective) name matches a property on the model.
//! Controls with no name or no matching property coexist in the same view
//! and are skipped silently.
//!
//! Each binding is self-contained: a view-to-model listener registered on
//! the control's change event, and, for notifying properties, a
//! model-to-view listener subscribed to the property, its guard parked on
//! the control. There is no shared binding registry. Closures capture the
//! control *weakly* so a binding never extends its control's lifetime;
//! once the control is gone its listeners degrade to no-ops and the parked
//! subscription guard has already been dropped with it.
//!
//! # Failure Modes
//!
//! - A named, property-matching control with no supported capability fails
//!   the whole `bind_all` with [`BindError::UnsupportedControl`].
//! - The initial model-to-view refresh propagates property errors (a broken
//!   converter aborts binding); listener-path errors at runtime are routed
//!   to the host's error reporting (`tracing::error!`) and leave the view
//!   in its last-rendered state.

use std::fmt;
use std::rc::Rc;

use tracing::{debug, error, trace};

use stitch_core::control::{ActionTrigger, ControlHandle, TextInput, ToggleSwitch, descendants};
use stitch_core::record::Record;
use stitch_core::value::Value;

use crate::property::{Property, PropertyError};
use crate::viewmodel::ViewModel;

/// Reserved delimiter separating a control's property name from encoded
/// per-control metadata. The suffix is currently ignored.
pub const NAME_SUFFIX_DELIMITER: &str = "__";

/// The property name a control name refers to: everything before the first
/// `"__"`.
#[must_use]
pub fn effective_name(raw: &str) -> &str {
    raw.split_once(NAME_SUFFIX_DELIMITER)
        .map_or(raw, |(head, _)| head)
}

/// Errors from binding a view to a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// `bind` was called for a control whose name matches no property.
    UnknownProperty { control: String },
    /// The control offers none of the supported capability surfaces.
    UnsupportedControl { control: String },
    /// The initial model-to-view refresh failed.
    Property {
        control: String,
        source: PropertyError,
    },
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownProperty { control } => {
                write!(f, "control '{control}' matches no model property")
            }
            Self::UnsupportedControl { control } => {
                write!(f, "control '{control}' has no bindable capability")
            }
            Self::Property { control, source } => {
                write!(f, "binding control '{control}' failed: {source}")
            }
        }
    }
}

impl std::error::Error for BindError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Property { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Bind every matching descendant control under `root` to `model`.
///
/// Pre-order traversal; unnamed controls and controls matching no property
/// are skipped. The first failing binding aborts the walk.
pub fn bind_all(model: &ViewModel, root: &ControlHandle) -> Result<(), BindError> {
    for control in descendants(root) {
        let raw = control.name();
        if raw.is_empty() {
            continue;
        }
        if model.property(effective_name(raw)).is_some() {
            bind(model, &control)?;
        } else {
            trace!(control = raw, "no matching property, control skipped");
        }
    }
    Ok(())
}

/// Bind a single control to the model property its name refers to.
///
/// Capability dispatch happens once, here; the per-kind hookups own the rest.
pub fn bind(model: &ViewModel, control: &ControlHandle) -> Result<(), BindError> {
    let raw = control.name().to_string();
    let name = effective_name(&raw).to_string();
    let Some(property) = model.property(&name) else {
        return Err(BindError::UnknownProperty { control: raw });
    };

    if let Some(input) = Rc::clone(control).as_text_input() {
        hook_text_input(model, &name, &property, &input)
    } else if let Some(toggle) = Rc::clone(control).as_toggle_switch() {
        hook_toggle_switch(model, &name, &property, &toggle)
    } else if let Some(trigger) = Rc::clone(control).as_action_trigger() {
        hook_action_trigger(model, &name, &property, &trigger);
        Ok(())
    } else {
        Err(BindError::UnsupportedControl { control: raw })
    }
}

fn refresh_text(
    property: &Property,
    owner: &Record,
    control: &Rc<dyn TextInput>,
) -> Result<(), PropertyError> {
    let value = property.get(owner)?;
    control.set_text(&value.to_text());
    control.set_enabled(property.is_enabled(owner));
    Ok(())
}

fn hook_text_input(
    model: &ViewModel,
    name: &str,
    property: &Rc<Property>,
    control: &Rc<dyn TextInput>,
) -> Result<(), BindError> {
    refresh_text(property, model.record(), control).map_err(|source| BindError::Property {
        control: name.to_string(),
        source,
    })?;

    let commit = {
        let property = Rc::clone(property);
        let owner = model.record().clone();
        let control = Rc::downgrade(control);
        let name = name.to_string();
        move || {
            let Some(control) = control.upgrade() else {
                return;
            };
            if let Err(err) = property.set(&owner, Value::Text(control.text())) {
                error!(property = %name, %err, "committed edit rejected");
            }
        }
    };
    control.on_commit(Rc::new(commit));

    if property.is_notifying() {
        let refresh = {
            let property = Rc::clone(property);
            let owner = model.record().clone();
            let control = Rc::downgrade(control);
            let name = name.to_string();
            move || {
                let Some(control) = control.upgrade() else {
                    return;
                };
                if let Err(err) = refresh_text(&property, &owner, &control) {
                    error!(property = %name, %err, "view refresh failed");
                }
            }
        };
        control.retain(property.subscribe(model.record(), refresh));
    }

    debug!(control = name, "text input bound");
    Ok(())
}

fn refresh_toggle(
    property: &Property,
    owner: &Record,
    control: &Rc<dyn ToggleSwitch>,
) -> Result<(), PropertyError> {
    let value = property.get(owner)?;
    control.set_checked(value.is_truthy());
    control.set_enabled(property.is_enabled(owner));
    Ok(())
}

fn hook_toggle_switch(
    model: &ViewModel,
    name: &str,
    property: &Rc<Property>,
    control: &Rc<dyn ToggleSwitch>,
) -> Result<(), BindError> {
    refresh_toggle(property, model.record(), control).map_err(|source| BindError::Property {
        control: name.to_string(),
        source,
    })?;

    let toggled = {
        let property = Rc::clone(property);
        let owner = model.record().clone();
        let control = Rc::downgrade(control);
        let name = name.to_string();
        move || {
            let Some(control) = control.upgrade() else {
                return;
            };
            if let Err(err) = property.set(&owner, Value::Bool(control.checked())) {
                error!(property = %name, %err, "toggle rejected");
            }
        }
    };
    control.on_toggle(Rc::new(toggled));

    if property.is_notifying() {
        let refresh = {
            let property = Rc::clone(property);
            let owner = model.record().clone();
            let control = Rc::downgrade(control);
            let name = name.to_string();
            move || {
                let Some(control) = control.upgrade() else {
                    return;
                };
                if let Err(err) = refresh_toggle(&property, &owner, &control) {
                    error!(property = %name, %err, "view refresh failed");
                }
            }
        };
        control.retain(property.subscribe(model.record(), refresh));
    }

    debug!(control = name, "toggle switch bound");
    Ok(())
}

fn hook_action_trigger(
    model: &ViewModel,
    name: &str,
    property: &Rc<Property>,
    control: &Rc<dyn ActionTrigger>,
) {
    let activated = {
        let property = Rc::clone(property);
        let owner = model.record().clone();
        let name = name.to_string();
        move || {
            // Look the action up on every activation; it may be rebound.
            match property.get(&owner) {
                Ok(Value::Action(action)) => action(),
                Ok(other) => {
                    error!(property = %name, value = ?other, "activation target is not an action");
                }
                Err(err) => error!(property = %name, %err, "activation lookup failed"),
            }
        }
    };
    control.on_activate(Rc::new(activated));

    debug!(control = name, "action trigger bound");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
