//! Credential slot capability.
//!
//! SYSTEM CONTEXT
//! ==============
//! The controller is the only writer. Credentials are never deleted here;
//! an expired token simply fails validation on the next load.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::cell::RefCell;

use crate::error::GateError;

/// Read/write access to the single persisted credential.
pub trait SessionStore {
    /// Current credential, `None` when the key is unset.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Storage`] when the backing storage is unavailable.
    fn credential(&self) -> Result<Option<String>, GateError>;

    /// Persist a freshly issued credential.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Storage`] when the write is refused.
    fn set_credential(&self, token: &str) -> Result<(), GateError>;
}

/// In-process store for hosts without browser storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: RefCell<Option<String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_credential(token: &str) -> Self {
        Self { slot: RefCell::new(Some(token.to_owned())) }
    }
}

impl SessionStore for MemoryStore {
    fn credential(&self) -> Result<Option<String>, GateError> {
        Ok(self.slot.borrow().clone())
    }

    fn set_credential(&self, token: &str) -> Result<(), GateError> {
        *self.slot.borrow_mut() = Some(token.to_owned());
        Ok(())
    }
}

/// `window.localStorage` under a fixed key.
#[cfg(feature = "hydrate")]
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    key: String,
}

#[cfg(feature = "hydrate")]
impl LocalStorageStore {
    #[must_use]
    pub fn new(key: &str) -> Self {
        Self { key: key.to_owned() }
    }

    fn storage() -> Result<web_sys::Storage, GateError> {
        let window = web_sys::window().ok_or_else(|| GateError::Storage("no window".to_owned()))?;
        window
            .local_storage()
            .map_err(|e| GateError::Storage(format!("localStorage denied: {e:?}")))?
            .ok_or_else(|| GateError::Storage("localStorage unavailable".to_owned()))
    }
}

#[cfg(feature = "hydrate")]
impl SessionStore for LocalStorageStore {
    fn credential(&self) -> Result<Option<String>, GateError> {
        Self::storage()?
            .get_item(&self.key)
            .map_err(|e| GateError::Storage(format!("read {}: {e:?}", self.key)))
    }

    fn set_credential(&self, token: &str) -> Result<(), GateError> {
        Self::storage()?
            .set_item(&self.key, token)
            .map_err(|e| GateError::Storage(format!("write {}: {e:?}", self.key)))
    }
}
