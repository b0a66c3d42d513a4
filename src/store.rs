//! Credential store write contract.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use ssi::vc::CredentialOrJWT;
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;

/// An error relating to the credential store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Write to the persistence backend failed.
    #[error("Failed to store credential {0}: {1}")]
    WriteFailure(String, String),
}

/// A stored credential together with the DID of its issuer. Credentials with
/// a JWT proof are stored in compact JWS form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialStoreItem {
    #[serde(rename = "did")]
    pub issuer_did: String,
    pub credential: CredentialOrJWT,
}

/// Persists issued credentials keyed by credential ID within a logical group.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Stores a signed credential. Re-storing under the same ID is an
    /// idempotent overwrite.
    async fn store_credential(
        &self,
        id: &str,
        item: CredentialStoreItem,
        group: &str,
    ) -> Result<(), StoreError>;
}

/// In-memory credential store, for tests and embedding scenarios.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    credentials: Mutex<HashMap<(String, String), CredentialStoreItem>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str, group: &str) -> Option<CredentialStoreItem> {
        self.credentials
            .lock()
            .unwrap()
            .get(&(group.to_string(), id.to_string()))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.credentials.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn store_credential(
        &self,
        id: &str,
        item: CredentialStoreItem,
        group: &str,
    ) -> Result<(), StoreError> {
        self.credentials
            .lock()
            .unwrap()
            .insert((group.to_string(), id.to_string()), item);
        Ok(())
    }
}
