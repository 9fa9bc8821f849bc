//! `window.localStorage` backed [`StorageArea`]. Requires a browser.

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

use super::{ChangeHandler, StorageArea, StorageChange};
use crate::error::StorageError;
use crate::util::teardown::Teardown;

const STORAGE_EVENT: &str = "storage";

/// The current tab's `localStorage`. Looked up on every call because access
/// can start failing mid-session (e.g. the user blocks site data).
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorageArea;

fn window() -> Result<web_sys::Window, StorageError> {
    web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".into()))
}

fn storage() -> Result<web_sys::Storage, StorageError> {
    match window()?.local_storage() {
        Ok(Some(storage)) => Ok(storage),
        Ok(None) => Err(StorageError::Unavailable("localStorage disabled".into())),
        Err(e) => Err(StorageError::Unavailable(format!("{e:?}"))),
    }
}

impl StorageArea for LocalStorageArea {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        storage()?
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::WriteRejected(format!("{e:?}")))
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        storage()?
            .remove_item(key)
            .map_err(|e| StorageError::WriteRejected(format!("{e:?}")))
    }

    fn subscribe(&self, handler: ChangeHandler) -> Result<Teardown, StorageError> {
        let window = window()?;
        let listener = Closure::<dyn FnMut(web_sys::StorageEvent)>::new(move |ev: web_sys::StorageEvent| {
            let watched_area = match (ev.storage_area(), storage()) {
                (Some(area), Ok(local)) => area == local,
                _ => false,
            };
            if let Some(change) = StorageChange::from_event(watched_area, ev.key(), ev.new_value()) {
                handler(&change);
            }
        });
        window
            .add_event_listener_with_callback(STORAGE_EVENT, listener.as_ref().unchecked_ref())
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))?;
        log::debug!("subscribed to storage events");

        Ok(Teardown::new(move || {
            if let Some(window) = web_sys::window() {
                if let Err(e) =
                    window.remove_event_listener_with_callback(STORAGE_EVENT, listener.as_ref().unchecked_ref())
                {
                    log::warn!("failed to remove storage listener: {e:?}");
                }
            }
            drop(listener);
        }))
    }
}
