#![forbid(unsafe_code)]

//! In-memory fake controls implementing the toolkit boundary.
//!
//! These stand in for a real widget toolkit in tests and demos. They model
//! the event behavior bindings rely on:
//!
//! - [`TextBox::set_text`] is silent (real text inputs do not re-emit the
//!   commit event when programmatically updated); user edits are simulated
//!   by `set_text` followed by [`TextBox::commit`].
//! - [`Toggle::set_checked`] fires the toggled event only when the state
//!   actually changes, like real toolkits. A model-driven refresh that
//!   writes the same state back therefore terminates instead of echoing
//!   forever.
//! - Every control retains its registered listeners and parked
//!   subscriptions until it is dropped.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::trace;

use stitch_core::control::{
    ActionTrigger, Control, ControlHandle, ListenerHandle, TextInput, ToggleSwitch,
};
use stitch_core::subscribe::Subscription;

fn fire(listeners: &RefCell<Vec<ListenerHandle>>) {
    // Snapshot before invoking: a listener may register further listeners
    // or trigger a refresh that lands back in this control.
    let snapshot: Vec<ListenerHandle> = listeners.borrow().clone();
    for listener in snapshot {
        listener();
    }
}

/// A single-line text input.
pub struct TextBox {
    name: String,
    text: RefCell<String>,
    enabled: Cell<bool>,
    commit_listeners: RefCell<Vec<ListenerHandle>>,
    retained: RefCell<Vec<Subscription>>,
}

impl TextBox {
    /// Create a named text box with empty text.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            text: RefCell::new(String::new()),
            enabled: Cell::new(true),
            commit_listeners: RefCell::new(Vec::new()),
            retained: RefCell::new(Vec::new()),
        })
    }

    /// Simulate the user finishing an edit: fire the commit event.
    pub fn commit(&self) {
        trace!(control = %self.name, "commit fired");
        fire(&self.commit_listeners);
    }
}

impl Control for TextBox {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
    }

    fn retain(&self, subscription: Subscription) {
        self.retained.borrow_mut().push(subscription);
    }

    fn as_text_input(self: Rc<Self>) -> Option<Rc<dyn TextInput>> {
        Some(self)
    }
}

impl TextInput for TextBox {
    fn text(&self) -> String {
        self.text.borrow().clone()
    }

    fn set_text(&self, text: &str) {
        *self.text.borrow_mut() = text.to_string();
    }

    fn on_commit(&self, listener: ListenerHandle) {
        self.commit_listeners.borrow_mut().push(listener);
    }
}

/// A two-state toggle (check box).
pub struct Toggle {
    name: String,
    checked: Cell<bool>,
    enabled: Cell<bool>,
    toggle_listeners: RefCell<Vec<ListenerHandle>>,
    retained: RefCell<Vec<Subscription>>,
}

impl Toggle {
    /// Create a named, unchecked toggle.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            checked: Cell::new(false),
            enabled: Cell::new(true),
            toggle_listeners: RefCell::new(Vec::new()),
            retained: RefCell::new(Vec::new()),
        })
    }
}

impl Control for Toggle {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
    }

    fn retain(&self, subscription: Subscription) {
        self.retained.borrow_mut().push(subscription);
    }

    fn as_toggle_switch(self: Rc<Self>) -> Option<Rc<dyn ToggleSwitch>> {
        Some(self)
    }
}

impl ToggleSwitch for Toggle {
    fn checked(&self) -> bool {
        self.checked.get()
    }

    fn set_checked(&self, checked: bool) {
        if self.checked.get() == checked {
            return;
        }
        self.checked.set(checked);
        trace!(control = %self.name, checked, "toggled");
        fire(&self.toggle_listeners);
    }

    fn on_toggle(&self, listener: ListenerHandle) {
        self.toggle_listeners.borrow_mut().push(listener);
    }
}

/// A push button firing an action on click.
pub struct PushButton {
    name: String,
    enabled: Cell<bool>,
    activate_listeners: RefCell<Vec<ListenerHandle>>,
    retained: RefCell<Vec<Subscription>>,
}

impl PushButton {
    /// Create a named button.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            enabled: Cell::new(true),
            activate_listeners: RefCell::new(Vec::new()),
            retained: RefCell::new(Vec::new()),
        })
    }

    /// Simulate a click: fire the activated event.
    pub fn click(&self) {
        trace!(control = %self.name, "clicked");
        fire(&self.activate_listeners);
    }
}

impl Control for PushButton {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
    }

    fn retain(&self, subscription: Subscription) {
        self.retained.borrow_mut().push(subscription);
    }

    fn as_action_trigger(self: Rc<Self>) -> Option<Rc<dyn ActionTrigger>> {
        Some(self)
    }
}

impl ActionTrigger for PushButton {
    fn on_activate(&self, listener: ListenerHandle) {
        self.activate_listeners.borrow_mut().push(listener);
    }
}

/// A container with ordered children and no bindable capability.
pub struct Panel {
    name: String,
    enabled: Cell<bool>,
    children: RefCell<Vec<ControlHandle>>,
    retained: RefCell<Vec<Subscription>>,
}

impl Panel {
    /// Create a named, empty panel.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            enabled: Cell::new(true),
            children: RefCell::new(Vec::new()),
            retained: RefCell::new(Vec::new()),
        })
    }

    /// Append a child control.
    pub fn push(&self, child: ControlHandle) {
        self.children.borrow_mut().push(child);
    }
}

impl Control for Panel {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
    }

    fn children(&self) -> Vec<ControlHandle> {
        self.children.borrow().clone()
    }

    fn retain(&self, subscription: Subscription) {
        self.retained.borrow_mut().push(subscription);
    }
}

/// Build an unnamed window (panel) holding the given controls in order.
#[must_use]
pub fn make_window(controls: impl IntoIterator<Item = ControlHandle>) -> ControlHandle {
    let window = Panel::new("");
    for control in controls {
        window.push(control);
    }
    window
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
