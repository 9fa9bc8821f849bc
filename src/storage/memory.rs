//! In-memory storage that models one origin shared by several tabs.
//!
//! Each [`MemoryStorageArea`] is one execution context. A write through one
//! context queues a [`StorageChange`] for every *other* context; queued
//! changes reach listeners only when [`MemoryStorage::deliver_pending`] runs,
//! mirroring the asynchronous browser `storage` event.

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use super::{ChangeHandler, StorageArea, StorageChange};
use crate::error::StorageError;
use crate::util::teardown::Teardown;

struct Context {
    id: usize,
    listeners: Vec<(u64, ChangeHandler)>,
    queue: VecDeque<StorageChange>,
}

#[derive(Default)]
struct Origin {
    items: BTreeMap<String, String>,
    contexts: Vec<Context>,
    next_context: usize,
    next_listener: u64,
    unavailable: bool,
    reject_writes: bool,
}

impl Origin {
    fn context_mut(&mut self, id: usize) -> Option<&mut Context> {
        self.contexts.iter_mut().find(|c| c.id == id)
    }

    fn broadcast(&mut self, from: usize, change: &StorageChange) {
        for ctx in self.contexts.iter_mut().filter(|c| c.id != from) {
            ctx.queue.push_back(change.clone());
        }
    }
}

/// Shared backing store for any number of simulated tabs.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    origin: Rc<RefCell<Origin>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that fails every operation, as when the browser blocks it.
    pub fn unavailable() -> Self {
        let storage = Self::new();
        storage.origin.borrow_mut().unavailable = true;
        storage
    }

    /// Make every subsequent write fail, as on quota exhaustion.
    pub fn reject_writes(&self, reject: bool) {
        self.origin.borrow_mut().reject_writes = reject;
    }

    /// Open a new execution context (a tab) on this origin.
    pub fn context(&self) -> MemoryStorageArea {
        let mut origin = self.origin.borrow_mut();
        let id = origin.next_context;
        origin.next_context += 1;
        origin.contexts.push(Context { id, listeners: Vec::new(), queue: VecDeque::new() });
        MemoryStorageArea { origin: Rc::clone(&self.origin), id }
    }

    /// Put a value in place without notifying anyone, as if written in an
    /// earlier session.
    pub fn seed(&self, key: &str, value: &str) {
        self.origin.borrow_mut().items.insert(key.to_owned(), value.to_owned());
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.origin.borrow().items.get(key).cloned()
    }

    /// Drop every stored value and notify all contexts, like `clear()` from
    /// a tab that is not being simulated.
    pub fn clear_from_elsewhere(&self) {
        let mut origin = self.origin.borrow_mut();
        origin.items.clear();
        let change = StorageChange { key: None, new_value: None };
        for ctx in &mut origin.contexts {
            ctx.queue.push_back(change.clone());
        }
    }

    /// Number of changes waiting to be delivered across all contexts.
    pub fn queued(&self) -> usize {
        self.origin.borrow().contexts.iter().map(|c| c.queue.len()).sum()
    }

    /// Deliver every queued change to the listeners of its context. Returns
    /// the number of handler invocations.
    pub fn deliver_pending(&self) -> usize {
        let mut delivered = 0;
        loop {
            let batch: Vec<(StorageChange, Vec<ChangeHandler>)> = {
                let mut origin = self.origin.borrow_mut();
                origin
                    .contexts
                    .iter_mut()
                    .filter_map(|ctx| {
                        let change = ctx.queue.pop_front()?;
                        let handlers = ctx.listeners.iter().map(|(_, h)| Rc::clone(h)).collect();
                        Some((change, handlers))
                    })
                    .collect()
            };
            if batch.is_empty() {
                break;
            }
            // Handlers run without the origin borrowed so they may read or write.
            for (change, handlers) in batch {
                for handler in handlers {
                    handler(&change);
                    delivered += 1;
                }
            }
        }
        delivered
    }
}

/// One execution context's view of a [`MemoryStorage`].
pub struct MemoryStorageArea {
    origin: Rc<RefCell<Origin>>,
    id: usize,
}

impl MemoryStorageArea {
    fn check_available(&self) -> Result<(), StorageError> {
        if self.origin.borrow().unavailable {
            return Err(StorageError::Unavailable("storage disabled".into()));
        }
        Ok(())
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        self.check_available()?;
        if self.origin.borrow().reject_writes {
            return Err(StorageError::WriteRejected("quota exceeded".into()));
        }
        Ok(())
    }
}

impl StorageArea for MemoryStorageArea {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check_available()?;
        Ok(self.origin.borrow().items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_writable()?;
        let mut origin = self.origin.borrow_mut();
        let previous = origin.items.insert(key.to_owned(), value.to_owned());
        if previous.as_deref() != Some(value) {
            let change = StorageChange { key: Some(key.to_owned()), new_value: Some(value.to_owned()) };
            origin.broadcast(self.id, &change);
        }
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.check_writable()?;
        let mut origin = self.origin.borrow_mut();
        if origin.items.remove(key).is_some() {
            let change = StorageChange { key: Some(key.to_owned()), new_value: None };
            origin.broadcast(self.id, &change);
        }
        Ok(())
    }

    fn subscribe(&self, handler: ChangeHandler) -> Result<Teardown, StorageError> {
        self.check_available()?;
        let listener = {
            let mut origin = self.origin.borrow_mut();
            let listener = origin.next_listener;
            origin.next_listener += 1;
            if let Some(ctx) = origin.context_mut(self.id) {
                ctx.listeners.push((listener, handler));
            }
            listener
        };
        let origin = Rc::downgrade(&self.origin);
        let id = self.id;
        Ok(Teardown::new(move || {
            if let Some(origin) = origin.upgrade() {
                if let Some(ctx) = origin.borrow_mut().context_mut(id) {
                    ctx.listeners.retain(|(l, _)| *l != listener);
                }
            }
        }))
    }
}

impl Drop for MemoryStorageArea {
    fn drop(&mut self) {
        // A closed tab stops receiving events.
        if let Ok(mut origin) = self.origin.try_borrow_mut() {
            origin.contexts.retain(|c| c.id != self.id);
        }
    }
}
