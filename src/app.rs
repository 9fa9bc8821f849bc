//! Root consent component.
//!
//! The crate ships no server. A site that renders with the `ssr` feature
//! mounts [`App`] inside its own HTML shell (with `HydrationScripts` and
//! `MetaTags`), and the WASM bundle hydrates it through [`crate::hydrate`].

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};

use crate::components::consent_aware_loader::ConsentAwareLoader;
use crate::components::consent_banner::ConsentBanner;
use crate::config::AnalyticsVendor;

/// Consent surfaces for the site: one banner and one gated loader per
/// analytics vendor, all sharing the page's single consent store.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    // Storage and configuration exist only once the page is interactive.
    #[cfg(feature = "hydrate")]
    crate::components::services::ConsentServices::provide(
        crate::storage::ConsentStore::new(std::rc::Rc::new(crate::storage::LocalStorageArea)),
        crate::config::AnalyticsConfig::from_build_env(),
    );

    view! {
        <Title text="AgentOS"/>
        {AnalyticsVendor::ALL
            .into_iter()
            .map(|vendor| view! { <ConsentAwareLoader vendor=vendor/> })
            .collect_view()}
        <ConsentBanner/>
    }
}
