//! Consent services shared with every consent component through context.

#[cfg(test)]
#[path = "services_test.rs"]
mod services_test;

use leptos::prelude::*;

use crate::config::{AnalyticsConfig, AnalyticsVendor, BannerOptions, VendorTag};
use crate::storage::ConsentStore;

/// One consent store and one parsed configuration per page. Provided by
/// [`crate::app::App`]; components that find no services stay inert.
#[derive(Clone, Copy)]
pub struct ConsentServices {
    store: StoredValue<ConsentStore, LocalStorage>,
    config: StoredValue<AnalyticsConfig>,
}

impl ConsentServices {
    /// Put `store` and `config` in context for the current owner's subtree.
    pub fn provide(store: ConsentStore, config: AnalyticsConfig) {
        provide_context(Self { store: StoredValue::new_local(store), config: StoredValue::new(config) });
    }

    pub fn from_context() -> Option<Self> {
        use_context::<Self>()
    }

    /// A handle to the shared store. Clones share same-tab listeners.
    pub fn store(&self) -> Option<ConsentStore> {
        self.store.try_get_value()
    }

    pub fn tag(&self, vendor: AnalyticsVendor) -> Option<VendorTag> {
        self.config.try_with_value(|config| config.tag(vendor).cloned()).flatten()
    }

    pub fn banner_options(&self) -> BannerOptions {
        self.config.try_with_value(|config| config.banner).unwrap_or_default()
    }
}
