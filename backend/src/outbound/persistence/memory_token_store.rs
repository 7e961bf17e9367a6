//! In-memory bearer token store.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use rand::RngCore;

use crate::domain::ports::{TokenStore, TokenStoreError};
use crate::domain::{AccessToken, UserId};

const TOKEN_LEN: usize = 32;

struct TokenEntry {
    user_id: UserId,
    expires_at: DateTime<Utc>,
}

/// Process-local token store with per-token expiry.
///
/// Tokens are 32 bytes of OS randomness, hex encoded. Expired entries are
/// purged lazily whenever a new token is issued.
pub struct MemoryTokenStore {
    tokens: RwLock<HashMap<String, TokenEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl MemoryTokenStore {
    /// Create an empty store issuing tokens valid for `ttl`.
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            tokens: RwLock::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    fn write(
        &self,
    ) -> Result<RwLockWriteGuard<'_, HashMap<String, TokenEntry>>, TokenStoreError> {
        self.tokens.write().map_err(|_| TokenStoreError::Storage {
            message: "token store lock poisoned".to_owned(),
        })
    }

    fn mint() -> String {
        let mut material = [0u8; TOKEN_LEN];
        rand::thread_rng().fill_bytes(&mut material);
        hex::encode(material)
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn issue(&self, user_id: UserId) -> Result<AccessToken, TokenStoreError> {
        let now = self.clock.utc();
        let raw = Self::mint();
        let token = AccessToken::new(raw.clone()).map_err(|err| TokenStoreError::Storage {
            message: format!("minted token rejected: {err}"),
        })?;

        let mut tokens = self.write()?;
        tokens.retain(|_, entry| entry.expires_at > now);
        tokens.insert(
            raw,
            TokenEntry {
                user_id,
                expires_at: now + self.ttl,
            },
        );
        Ok(token)
    }

    async fn resolve(&self, token: &AccessToken) -> Result<Option<UserId>, TokenStoreError> {
        let now = self.clock.utc();
        let tokens = self.tokens.read().map_err(|_| TokenStoreError::Storage {
            message: "token store lock poisoned".to_owned(),
        })?;
        Ok(tokens
            .get(token.reveal())
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.user_id))
    }
}
