use super::KeyValueStore;
use crate::error::Result;

/// Fixed key the bearer token lives under.
pub const TOKEN_KEY: &str = "token";

/// Saves, loads and clears the single authentication token.
///
/// No expiry check happens here; a stale token is only discovered by the
/// next authenticated request.
pub struct SessionStore {
    kv: Box<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(kv: Box<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub fn save(&self, token: &str) -> Result<()> {
        self.kv.set(TOKEN_KEY, token)
    }

    pub fn load(&self) -> Result<Option<String>> {
        Ok(self.kv.get(TOKEN_KEY)?.filter(|t| !t.is_empty()))
    }

    pub fn clear(&self) -> Result<()> {
        self.kv.remove(TOKEN_KEY)
    }
}
