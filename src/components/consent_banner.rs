//! Cookie consent prompt pinned to the bottom of the viewport.

use leptos::prelude::*;

#[cfg(feature = "hydrate")]
use std::rc::Rc;

use crate::gate::BannerController;
#[cfg(feature = "hydrate")]
use crate::state::banner::BannerPhase;

/// Prompt offering Accept, Decline, and a close button.
///
/// Hidden until the controller decides to show it, which never happens when
/// a decision is already stored.
#[component]
pub fn ConsentBanner() -> impl IntoView {
    let visible = RwSignal::new(false);
    let controller = StoredValue::new_local(None::<BannerController>);

    #[cfg(feature = "hydrate")]
    {
        let services = crate::components::services::ConsentServices::from_context();
        Effect::new(move || {
            if controller.with_value(Option::is_some) {
                return;
            }
            let Some((store, options)) = services.and_then(|s| Some((s.store()?, s.banner_options()))) else {
                log::debug!("no consent services; banner inert");
                return;
            };
            let banner = BannerController::new(store, Rc::new(crate::util::timer::BrowserScheduler), options);
            banner.on_change(move |phase| visible.set(phase == BannerPhase::Shown));
            banner.mount();
            controller.set_value(Some(banner));
        });
    }

    on_cleanup(move || {
        controller.try_update_value(|slot| {
            if let Some(banner) = slot.take() {
                banner.unmount();
            }
        });
    });

    let run = move |action: fn(&BannerController)| {
        controller.with_value(|slot| {
            if let Some(banner) = slot {
                action(banner);
            }
        });
    };
    let on_accept = move |_| run(BannerController::accept);
    let on_decline = move |_| run(BannerController::decline);
    let on_dismiss = move |_| run(BannerController::dismiss);

    view! {
        <Show when=move || visible.get()>
            <div class="consent-banner" role="dialog" aria-live="polite" aria-label="Privacy and cookies">
                <div class="consent-banner__header">
                    <span class="consent-banner__title">"Privacy & Cookies"</span>
                    <button class="consent-banner__close" on:click=on_dismiss aria-label="Dismiss">
                        "✕"
                    </button>
                </div>
                <p class="consent-banner__body">
                    "We use cookies to analyze traffic and improve your experience. "
                    "No personal data is stored on our servers."
                </p>
                <div class="consent-banner__actions">
                    <button class="consent-banner__accept" on:click=on_accept>
                        "Accept All"
                    </button>
                    <button class="consent-banner__decline" on:click=on_decline>
                        "Decline"
                    </button>
                </div>
            </div>
        </Show>
    }
}
