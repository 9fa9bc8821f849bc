//! # consent-gate
//!
//! Client-side consent gating for the marketing site. Decides whether the
//! third-party analytics tags may run, persists the visitor's decision in
//! `localStorage`, and keeps the cookie banner and every analytics loader in
//! agreement across tabs.
//!
//! Layering, leaf to root: `storage` (shared persisted record), `state`
//! (pure reducers and decisions), `gate` (controllers owning timers and
//! subscriptions), `components` (Leptos views), `app`.

pub mod app;
pub mod components;
pub mod config;
pub mod error;
pub mod gate;
pub mod state;
pub mod storage;
pub mod util;

/// WASM entry point: installs console logging and hydrates [`app::App`].
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        leptos::logging::warn!("console logger already installed: {e}");
    }
    leptos::mount::hydrate_body(app::App);
}
