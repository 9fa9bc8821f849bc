//! Leptos components for the consent surfaces.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components are thin shells over the `gate` controllers: they create a
//! controller once the page is interactive, mirror its state into signals,
//! and release it on cleanup. The store and configuration come from
//! [`services::ConsentServices`] in context. On the server they render their
//! idle state.

pub mod consent_aware_loader;
pub mod consent_banner;
pub mod services;
