#![forbid(unsafe_code)]

//! The toolkit boundary: control traits and view-tree traversal.
//!
//! The binding engine never talks to a concrete GUI toolkit. It sees a tree
//! of [`Control`] handles, asks each for its capability surface once at bind
//! time, and registers listeners the control retains for its own lifetime.
//!
//! # Design
//!
//! Capability dispatch is explicit: [`Control::as_text_input`] and friends
//! return `Some` only for controls that actually support that surface. The
//! resolver probes the capabilities in order and fails on a control that
//! offers none, instead of inspecting toolkit-specific runtime types.
//!
//! Listener lifetime follows the host-ownership rule: a control keeps every
//! callback registered on it (`on_commit`/`on_toggle`/`on_activate`) and
//! every parked [`Subscription`] alive until the control itself is dropped.
//! Nothing here outlives its control.

use std::rc::Rc;

use crate::subscribe::Subscription;

/// Shared handle to a control node.
pub type ControlHandle = Rc<dyn Control>;

/// A callback registered on a control's change event.
pub type ListenerHandle = Rc<dyn Fn()>;

/// Minimal surface every view node exposes to the binding engine.
pub trait Control {
    /// The control's assigned name. Empty for unnamed nodes, which the
    /// resolver skips.
    fn name(&self) -> &str;

    /// Current enabled state.
    fn is_enabled(&self) -> bool;

    /// Set the enabled state (whether the control accepts interaction).
    fn set_enabled(&self, enabled: bool);

    /// Direct children in layout order. Leaf controls return nothing.
    fn children(&self) -> Vec<ControlHandle> {
        Vec::new()
    }

    /// Park a subscription guard for this control's lifetime.
    ///
    /// The model-to-view listener of a binding is dropped (and thereby
    /// unsubscribed) together with the control, mirroring toolkits that
    /// parent listener objects to their widget.
    fn retain(&self, subscription: Subscription);

    /// Text-input capability, if this control edits text.
    fn as_text_input(self: Rc<Self>) -> Option<Rc<dyn TextInput>> {
        None
    }

    /// Toggle capability, if this control edits a boolean checked state.
    fn as_toggle_switch(self: Rc<Self>) -> Option<Rc<dyn ToggleSwitch>> {
        None
    }

    /// Trigger capability, if this control fires a parameterless action.
    fn as_action_trigger(self: Rc<Self>) -> Option<Rc<dyn ActionTrigger>> {
        None
    }
}

/// A control with an editable text surface.
pub trait TextInput: Control {
    /// The currently displayed text.
    fn text(&self) -> String;

    /// Replace the displayed text without firing the commit event.
    fn set_text(&self, text: &str);

    /// Register a listener for the edit-committed event. The control
    /// retains the listener until it is dropped.
    fn on_commit(&self, listener: ListenerHandle);
}

/// A control with a boolean checked state.
pub trait ToggleSwitch: Control {
    /// The current checked state.
    fn checked(&self) -> bool;

    /// Set the checked state. Implementations fire the toggle event only
    /// when the state actually changes, as real toolkits do.
    fn set_checked(&self, checked: bool);

    /// Register a listener for the toggled event.
    fn on_toggle(&self, listener: ListenerHandle);
}

/// A button-like control that fires an action on activation.
pub trait ActionTrigger: Control {
    /// Register a listener for the activated event.
    fn on_activate(&self, listener: ListenerHandle);
}

/// All descendants of `root` in pre-order, excluding `root` itself.
#[must_use]
pub fn descendants(root: &ControlHandle) -> Vec<ControlHandle> {
    fn walk(node: &ControlHandle, out: &mut Vec<ControlHandle>) {
        for child in node.children() {
            out.push(Rc::clone(&child));
            walk(&child, out);
        }
    }

    let mut out = Vec::new();
    walk(root, &mut out);
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
