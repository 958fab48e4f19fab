use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

pub(crate) const SERVICE_NAME: &str = "hardhat";
const KEYRING_ENTRY: &str = "access-token";

/// Durable home of the bearer token.
///
/// The token lives here and nowhere else: the API client returns it from
/// `login`, the refresh chain writes it through this trait, and every
/// authenticated call reads it back just before use. Implementations are
/// injected, so tests and headless runs swap the keyring for memory.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Current token, absent when never set or cleared. Never an empty
    /// string.
    async fn get(&self) -> Result<Option<String>, String>;

    /// Overwrite the token unconditionally.
    async fn set(&self, token: &str) -> Result<(), String>;

    /// Forget the token (logout).
    async fn clear(&self) -> Result<(), String>;
}

/// Token storage in the system keyring via Secret Service.
#[derive(Clone)]
pub struct KeyringCredentials;

impl KeyringCredentials {
    fn attributes() -> HashMap<&'static str, &'static str> {
        let mut attrs = HashMap::new();
        attrs.insert("service", SERVICE_NAME);
        attrs.insert("entry", KEYRING_ENTRY);
        attrs
    }
}

#[async_trait]
impl CredentialStore for KeyringCredentials {
    async fn get(&self) -> Result<Option<String>, String> {
        let keyring = oo7::Keyring::new()
            .await
            .map_err(|e| format!("Failed to connect to keyring: {}", e))?;

        let items = keyring
            .search_items(&Self::attributes())
            .await
            .map_err(|e| format!("Failed to search keyring: {}", e))?;

        if let Some(item) = items.first() {
            let secret_bytes = item
                .secret()
                .await
                .map_err(|e| format!("Failed to read secret: {}", e))?;
            let token = String::from_utf8(secret_bytes.to_vec())
                .map_err(|e| format!("Invalid UTF-8 in secret: {}", e))?;
            if !token.is_empty() {
                return Ok(Some(token));
            }
        }

        Ok(None)
    }

    async fn set(&self, token: &str) -> Result<(), String> {
        let keyring = oo7::Keyring::new()
            .await
            .map_err(|e| format!("Failed to connect to keyring: {}", e))?;

        keyring
            .create_item(
                "Hardhat access token",
                &Self::attributes(),
                token.as_bytes(),
                true, // replace existing
            )
            .await
            .map_err(|e| format!("Failed to store token: {}", e))?;

        Ok(())
    }

    async fn clear(&self) -> Result<(), String> {
        let keyring = oo7::Keyring::new()
            .await
            .map_err(|e| format!("Failed to connect to keyring: {}", e))?;

        let items = keyring
            .search_items(&Self::attributes())
            .await
            .map_err(|e| format!("Failed to search keyring: {}", e))?;

        for item in items {
            item.delete()
                .await
                .map_err(|e| format!("Failed to delete token: {}", e))?;
        }

        Ok(())
    }
}

/// In-memory token storage for tests and environments without a keyring.
#[derive(Clone, Default)]
pub struct MemoryCredentials {
    token: Arc<Mutex<Option<String>>>,
}

impl MemoryCredentials {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentials {
    async fn get(&self) -> Result<Option<String>, String> {
        Ok(self
            .token
            .lock()
            .unwrap()
            .clone()
            .filter(|t| !t.is_empty()))
    }

    async fn set(&self, token: &str) -> Result<(), String> {
        *self.token.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), String> {
        *self.token.lock().unwrap() = None;
        Ok(())
    }
}
