use crate::auth::models::CredentialRecord;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Lookup of stored credentials by login name.
///
/// Implementations may block on I/O; the issuer never holds a lock across a
/// lookup.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn lookup(&self, username: &str) -> anyhow::Result<Option<CredentialRecord>>;
}

/// Credential store kept in process memory, seeded at startup.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    records: RwLock<HashMap<String, CredentialRecord>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record for `record.username`.
    pub async fn insert(&self, record: CredentialRecord) {
        self.records
            .write()
            .await
            .insert(record.username.clone(), record);
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn lookup(&self, username: &str) -> anyhow::Result<Option<CredentialRecord>> {
        Ok(self.records.read().await.get(username).cloned())
    }
}
