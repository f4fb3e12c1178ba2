#![forbid(unsafe_code)]

//! Test harness and fake-toolkit fixtures for Stitch.
//!
//! The binding engine only ever sees the trait boundary in
//! `stitch_core::control`; this crate provides an in-memory implementation
//! of that boundary ([`TextBox`], [`Toggle`], [`PushButton`], [`Panel`])
//! plus a window builder and logging fixture, so bindings can be exercised
//! end-to-end without a real GUI toolkit. The end-to-end binding tests live
//! in this crate's `tests/` directory.

pub mod controls;
pub mod fixture;

pub use controls::{Panel, PushButton, TextBox, Toggle, make_window};
pub use fixture::init_test_logging;
