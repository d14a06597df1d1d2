//! Bearer token slot.
//!
//! Owned by exactly one client instance; holds at most one token. Setting
//! replaces, clearing removes. Never a process-wide global, so state cannot
//! leak across test cases.

use secrecy::{ExposeSecret, SecretString};
use std::sync::Mutex;

#[derive(Default)]
pub struct TokenStore {
    token: Mutex<Option<SecretString>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any existing token.
    pub fn set(&self, token: impl Into<String>) {
        if let Ok(mut slot) = self.token.lock() {
            *slot = Some(SecretString::from(token.into()));
        }
        tracing::info!("auth token set");
    }

    pub fn clear(&self) {
        if let Ok(mut slot) = self.token.lock() {
            *slot = None;
        }
        tracing::info!("auth token cleared");
    }

    /// Current token, or `None`.
    pub fn get(&self) -> Option<SecretString> {
        self.token.lock().ok().and_then(|slot| slot.clone())
    }

    /// Render the current token for an `Authorization` header.
    pub fn bearer_value(&self) -> Option<String> {
        self.get()
            .map(|token| token.expose_secret().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_and_clear_removes() {
        let store = TokenStore::new();
        assert!(store.get().is_none());

        store.set("first");
        assert_eq!(store.bearer_value().as_deref(), Some("first"));

        store.set("second");
        assert_eq!(store.bearer_value().as_deref(), Some("second"));

        store.clear();
        assert!(store.get().is_none());
        assert!(store.bearer_value().is_none());
    }
}
