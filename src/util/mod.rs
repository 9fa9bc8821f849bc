//! Utility helpers shared across consent modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Event-loop resources (timers, listeners) are wrapped here as explicit
//! handles so controllers can release them deterministically and tests can
//! drive them without a browser.

pub mod teardown;
pub mod timer;
