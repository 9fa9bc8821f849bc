//! Third-party analytics tag rendered only while analytics consent holds.

use leptos::prelude::*;

use crate::config::{AnalyticsVendor, VendorTag};
use crate::gate::LoaderController;
use crate::state::loader::ScriptState;

/// Renders `vendor`'s tag while the stored consent grants analytics and
/// removes it again if consent is revoked from another tab. Renders nothing
/// when the vendor has no configured id.
#[component]
pub fn ConsentAwareLoader(vendor: AnalyticsVendor) -> impl IntoView {
    let script = RwSignal::new(ScriptState::Absent);
    let revoked = RwSignal::new(false);
    let tag = RwSignal::new(None::<VendorTag>);
    let controller = StoredValue::new_local(None::<LoaderController>);

    #[cfg(feature = "hydrate")]
    {
        let services = crate::components::services::ConsentServices::from_context();
        Effect::new(move || {
            if controller.with_value(Option::is_some) {
                return;
            }
            let Some(store) = services.and_then(|s| s.store()) else {
                log::debug!("no consent services; {} loader inert", vendor.label());
                return;
            };
            let configured = services.and_then(|s| s.tag(vendor));
            if configured.is_none() {
                log::debug!("{} not configured; loader inert", vendor.label());
            }
            let loader = LoaderController::new(store, configured);
            tag.set(loader.tag());
            loader.on_change(move |state| {
                let withdrawn = controller.with_value(|slot| slot.as_ref().is_some_and(LoaderController::revoked));
                revoked.set(withdrawn);
                script.set(state);
            });
            loader.mount();
            script.set(loader.script_state());
            controller.set_value(Some(loader));
        });
    }

    on_cleanup(move || {
        controller.try_update_value(|slot| {
            if let Some(loader) = slot.take() {
                loader.unmount();
            }
        });
    });

    // Script elements inserted by the DOM API load async by default.
    move || {
        let tag = tag.get()?;
        if script.get().is_present() {
            return Some(
                view! {
                    <script id=format!("{}-init", vendor.element_id()) inner_html=tag.bootstrap_snippet()></script>
                    <script id=vendor.element_id() src=tag.script_src()></script>
                }
                .into_any(),
            );
        }
        let snippet = tag.revocation_snippet().filter(|_| revoked.get())?;
        Some(view! { <script id=format!("{}-revoke", vendor.element_id()) inner_html=snippet></script> }.into_any())
    }
}
