use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use gloo::storage::{LocalStorage, Storage};

use crate::error::{describe_js, AppError, AppResult};

/// A durable, string-valued key-value store (browser `localStorage` in the app)
pub trait KeyValueStore {
    fn get(&self, key: &str) -> AppResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> AppResult<()>;
}

/// `window.localStorage`
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStore;

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        LocalStorage::raw()
            .get_item(key)
            .map_err(|e| AppError::storage(key, describe_js(&e)))
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|e| AppError::storage(key, describe_js(&e)))
    }
}

/// In-memory store that counts writes, for tests and for environments
/// without `localStorage`
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: RefCell<HashMap<String, String>>,
    writes: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slot(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        store
    }

    /// Number of successful `set` calls so far
    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

/// Shared handle to the store, handed down the component tree as a context
#[derive(Clone)]
pub struct SharedStore(Rc<dyn KeyValueStore>);

impl SharedStore {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self(Rc::new(store))
    }

    pub fn from_rc(store: Rc<dyn KeyValueStore>) -> Self {
        Self(store)
    }

    /// `localStorage` if the browser exposes it, otherwise a volatile memory store
    pub fn browser() -> Self {
        match LocalStorage::raw().length() {
            Ok(_) => Self::new(LocalStore),
            Err(e) => {
                log::warn!("localStorage unavailable ({}); history will not survive reloads", describe_js(&e));
                Self::new(MemoryStore::new())
            }
        }
    }

    pub fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.0.get(key)
    }

    pub fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.0.set(key, value)
    }
}

impl PartialEq for SharedStore {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for SharedStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedStore")
    }
}
