//! Consent record access on top of a [`StorageArea`].
//!
//! DESIGN
//! ======
//! The record is a shared resource that any tab (or an older build of the
//! site) may have written, so every read is defensive: unavailable storage
//! and undecodable values both read as "no record". Writes that fail are
//! logged and dropped, and same-tab listeners are not told about them, so a
//! consent that could not be saved never enables tracking.
//!
//! TRADE-OFFS
//! ==========
//! There is no locking across tabs. The last writer wins, which is fine for
//! a coarse user-driven decision.

#[cfg(test)]
#[path = "consent_store_test.rs"]
mod consent_store_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::{StorageArea, StorageChange};
use crate::error::StorageError;
use crate::state::consent::ConsentRecord;
use crate::util::teardown::Teardown;

/// Key holding the structured consent record.
pub const CONSENT_KEY: &str = "agentos-cookie-consent";

/// Boolean flag written by older builds of the banner. Read once for
/// migration, then removed.
pub const LEGACY_CONSENT_KEY: &str = "agentos-consent";

type RecordHandler = Rc<dyn Fn(Option<ConsentRecord>)>;

#[derive(Default)]
struct LocalListeners {
    next_id: u64,
    handlers: Vec<(u64, RecordHandler)>,
}

/// Handle to the persisted consent record. Clones share same-tab listeners,
/// so every component in a tab should use clones of one store.
#[derive(Clone)]
pub struct ConsentStore {
    area: Rc<dyn StorageArea>,
    local: Rc<RefCell<LocalListeners>>,
    migration_checked: Rc<Cell<bool>>,
}

impl ConsentStore {
    pub fn new(area: Rc<dyn StorageArea>) -> Self {
        Self { area, local: Rc::default(), migration_checked: Rc::default() }
    }

    /// The current decision, or `None` when there is none or it cannot be
    /// read.
    pub fn read(&self) -> Option<ConsentRecord> {
        self.read_raw().as_deref().and_then(decode)
    }

    /// Whether *anything* is stored under the consent key, decodable or not.
    pub fn has_record(&self) -> bool {
        self.read_raw().is_some()
    }

    /// Overwrite the stored record. Failures are logged and swallowed.
    pub fn write(&self, record: &ConsentRecord) {
        if let Err(e) = self.try_write(record) {
            leptos::logging::warn!("consent not saved: {e}");
            return;
        }
        self.notify_local(Some(*record));
    }

    /// Listen for changes made by other tabs. Own writes are not reported
    /// here; see [`ConsentStore::subscribe_local_writes`].
    pub fn subscribe_external(&self, handler: impl Fn(Option<ConsentRecord>) + 'static) -> Teardown {
        let subscription = self.area.subscribe(Rc::new(move |change: &StorageChange| {
            if !change.concerns(CONSENT_KEY) {
                return;
            }
            handler(change.new_value.as_deref().and_then(decode));
        }));
        match subscription {
            Ok(teardown) => teardown,
            Err(e) => {
                leptos::logging::warn!("consent change notifications unavailable: {e}");
                Teardown::noop()
            }
        }
    }

    /// Listen for successful writes made through this store (any clone of
    /// it) in the current tab. Delivered synchronously from [`ConsentStore::write`].
    pub fn subscribe_local_writes(&self, handler: impl Fn(Option<ConsentRecord>) + 'static) -> Teardown {
        let id = {
            let mut local = self.local.borrow_mut();
            let id = local.next_id;
            local.next_id += 1;
            local.handlers.push((id, Rc::new(handler)));
            id
        };
        let local = Rc::downgrade(&self.local);
        Teardown::new(move || {
            if let Some(local) = local.upgrade() {
                local.borrow_mut().handlers.retain(|(h, _)| *h != id);
            }
        })
    }

    fn try_write(&self, record: &ConsentRecord) -> Result<(), StorageError> {
        let raw = record.to_json()?;
        self.area.set_item(CONSENT_KEY, &raw)
    }

    fn read_raw(&self) -> Option<String> {
        self.migrate_legacy();
        match self.area.get_item(CONSENT_KEY) {
            Ok(raw) => raw,
            Err(e) => {
                leptos::logging::warn!("consent unreadable, treating as undecided: {e}");
                None
            }
        }
    }

    fn notify_local(&self, record: Option<ConsentRecord>) {
        let handlers: Vec<RecordHandler> = self.local.borrow().handlers.iter().map(|(_, h)| Rc::clone(h)).collect();
        for handler in handlers {
            handler(record);
        }
    }

    /// Fold the legacy boolean key into the structured record, once per store.
    fn migrate_legacy(&self) {
        if self.migration_checked.replace(true) {
            return;
        }
        let Ok(Some(legacy)) = self.area.get_item(LEGACY_CONSENT_KEY) else {
            return;
        };
        if matches!(self.area.get_item(CONSENT_KEY), Ok(None)) && legacy == "true" {
            match self.try_write(&ConsentRecord::accepted()) {
                Ok(()) => leptos::logging::log!("migrated legacy consent flag"),
                Err(e) => {
                    leptos::logging::warn!("legacy consent migration failed: {e}");
                    return;
                }
            }
        }
        if let Err(e) = self.area.remove_item(LEGACY_CONSENT_KEY) {
            leptos::logging::warn!("could not remove legacy consent flag: {e}");
        }
    }
}

fn decode(raw: &str) -> Option<ConsentRecord> {
    match ConsentRecord::parse(raw) {
        Ok(record) => Some(record),
        Err(e) => {
            leptos::logging::warn!("ignoring stored consent: {e}");
            None
        }
    }
}
