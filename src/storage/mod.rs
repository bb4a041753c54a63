//! Host key-value persistence and the session token store built on it.

mod file_store;
mod memory_store;
mod session_store;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;
pub use session_store::{SessionStore, TOKEN_KEY};

use crate::error::Result;

/// Durable string key-value storage provided by the host environment.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
