//! Persistent key/value storage shared by every tab of the origin.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`StorageArea`] is the raw capability: string values plus change events
//! raised when *another* context writes. [`ConsentStore`] layers the consent
//! schema, legacy migration, and fail-closed error handling on top. The
//! browser build backs it with `localStorage`; tests use [`MemoryStorage`],
//! which can simulate several tabs over one origin.


pub mod consent_store;
#[cfg(feature = "hydrate")]
pub mod local;
pub mod memory;

pub use consent_store::ConsentStore;
#[cfg(feature = "hydrate")]
pub use local::LocalStorageArea;
pub use memory::{MemoryStorage, MemoryStorageArea};

use std::rc::Rc;

use crate::error::StorageError;
use crate::util::teardown::Teardown;

/// A change made by another execution context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageChange {
    /// `None` when the whole area was cleared.
    pub key: Option<String>,
    /// `None` when the key was removed.
    pub new_value: Option<String>,
}

impl StorageChange {
    /// Build from a raw `storage` event. Events raised for another storage
    /// area of the origin (`sessionStorage`, or a frame clearing its own)
    /// yield `None`.
    pub fn from_event(watched_area: bool, key: Option<String>, new_value: Option<String>) -> Option<Self> {
        watched_area.then_some(Self { key, new_value })
    }

    /// Whether this change can have affected `key`.
    pub fn concerns(&self, key: &str) -> bool {
        self.key.as_deref().is_none_or(|k| k == key)
    }
}

pub type ChangeHandler = Rc<dyn Fn(&StorageChange)>;

/// Raw storage capability.
pub trait StorageArea {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// Register for changes made by *other* contexts. Writes through this
    /// area are never reported back to it.
    fn subscribe(&self, handler: ChangeHandler) -> Result<Teardown, StorageError>;
}
