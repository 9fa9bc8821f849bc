//! Consent-aware loader lifecycle.
//!
//! The loader reads the store once on mount, then follows two channels:
//! external changes from other tabs, and writes made in this tab (which the
//! browser never reports back as `storage` events). Script presence always
//! tracks the latest derived consent, in both directions.

#[cfg(test)]
#[path = "loader_test.rs"]
mod loader_test;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::config::VendorTag;
use crate::state::consent::{ConsentRecord, analytics_allowed};
use crate::state::loader::{ScriptState, script_state};
use crate::storage::ConsentStore;
use crate::util::teardown::Teardown;

type ScriptObserver = Rc<dyn Fn(ScriptState)>;

struct LoaderInner {
    store: ConsentStore,
    tag: Option<VendorTag>,
    allowed: bool,
    script: ScriptState,
    revoked: bool,
    subscriptions: Vec<Teardown>,
    observer: Option<ScriptObserver>,
}

/// Drives one mounted consent-aware loader for a single vendor.
pub struct LoaderController {
    inner: Rc<RefCell<LoaderInner>>,
}

impl LoaderController {
    /// `tag` is `None` when the vendor is not configured; the loader then
    /// stays inert.
    pub fn new(store: ConsentStore, tag: Option<VendorTag>) -> Self {
        let inner = LoaderInner {
            store,
            tag,
            allowed: false,
            script: ScriptState::Absent,
            revoked: false,
            subscriptions: Vec::new(),
            observer: None,
        };
        Self { inner: Rc::new(RefCell::new(inner)) }
    }

    /// Called whenever script presence flips.
    pub fn on_change(&self, observer: impl Fn(ScriptState) + 'static) {
        self.inner.borrow_mut().observer = Some(Rc::new(observer));
    }

    pub fn mount(&self) {
        let store = {
            let guard = self.inner.borrow();
            if guard.tag.is_none() || !guard.subscriptions.is_empty() {
                return;
            }
            guard.store.clone()
        };

        apply(&self.inner, store.read());

        let external = {
            let weak = Rc::downgrade(&self.inner);
            store.subscribe_external(move |record| reapply(&weak, record))
        };
        let local = {
            let weak = Rc::downgrade(&self.inner);
            store.subscribe_local_writes(move |record| reapply(&weak, record))
        };
        self.inner.borrow_mut().subscriptions.extend([external, local]);
    }

    /// Stop listening. The last rendered script state is left as is; the
    /// component is going away with it.
    pub fn unmount(&self) {
        let (subscriptions, observer) = {
            let mut inner = self.inner.borrow_mut();
            (std::mem::take(&mut inner.subscriptions), inner.observer.take())
        };
        for subscription in subscriptions {
            subscription.release();
        }
        drop(observer);
    }

    pub fn script_state(&self) -> ScriptState {
        self.inner.borrow().script
    }

    /// True once the tag has been removed after running on this page. The
    /// vendor runtime outlives its script element and has to be told.
    pub fn revoked(&self) -> bool {
        self.inner.borrow().revoked
    }

    pub fn analytics_allowed(&self) -> bool {
        self.inner.borrow().allowed
    }

    pub fn tag(&self) -> Option<VendorTag> {
        self.inner.borrow().tag.clone()
    }

    /// Live listener count, for leak checks.
    pub fn subscription_count(&self) -> usize {
        self.inner.borrow().subscriptions.iter().filter(|s| s.is_armed()).count()
    }
}

fn reapply(inner: &Weak<RefCell<LoaderInner>>, record: Option<ConsentRecord>) {
    if let Some(inner) = inner.upgrade() {
        apply(&inner, record);
    }
}

fn apply(inner: &Rc<RefCell<LoaderInner>>, record: Option<ConsentRecord>) {
    let changed = {
        let mut guard = inner.borrow_mut();
        let allowed = analytics_allowed(record.as_ref());
        let next = script_state(guard.tag.is_some(), allowed);
        guard.allowed = allowed;
        if next == guard.script {
            None
        } else {
            guard.script = next;
            guard.revoked = next == ScriptState::Absent;
            Some((next, guard.observer.clone(), guard.tag.as_ref().map(|t| t.vendor.label())))
        }
    };
    let Some((next, observer, vendor)) = changed else {
        return;
    };
    match next {
        ScriptState::Present => leptos::logging::log!("{} tag started", vendor.unwrap_or("analytics")),
        ScriptState::Absent => leptos::logging::log!("{} tag stopped", vendor.unwrap_or("analytics")),
    }
    if let Some(observer) = observer {
        observer(next);
    }
}
