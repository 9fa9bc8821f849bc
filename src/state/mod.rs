//! Consent domain state and pure decision logic.
//!
//! DESIGN
//! ======
//! Everything here is plain data and reducers. Storage, timers, and rendering
//! live elsewhere so these rules stay unit-testable without a browser.

pub mod banner;
pub mod consent;
pub mod loader;
