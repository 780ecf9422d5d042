use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;

use super::{DocumentStore, VaultError, DIRECTION_PAGE_SIZE};
use crate::models::{Account, Selector};

/// In-process stand-in for a vault collection. Enforces the unique index on
/// `number` the same way the vault does.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collection: Mutex<Option<Vec<Account>>>,
    stale_exists: bool,
}

impl MemoryStore {
    pub fn with_collection() -> Self {
        Self {
            collection: Mutex::new(Some(Vec::new())),
            stale_exists: false,
        }
    }

    /// Makes `record_exists` always answer `false`, as if a concurrent writer
    /// inserted the same number right after the check.
    pub fn with_stale_exists(mut self) -> Self {
        self.stale_exists = true;
        self
    }

    pub fn len(&self) -> usize {
        self.collection
            .lock()
            .unwrap()
            .as_ref()
            .map_or(0, Vec::len)
    }

    fn with<T>(&self, f: impl FnOnce(&mut Vec<Account>) -> T) -> Result<T, VaultError> {
        let mut guard = self.collection.lock().unwrap();
        let docs = guard.as_mut().ok_or(VaultError::CollectionNotFound)?;
        Ok(f(docs))
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn collection_exists(&self) -> Result<bool, VaultError> {
        self.with(|_| true)
    }

    async fn collection_create(&self) -> Result<(), VaultError> {
        let mut guard = self.collection.lock().unwrap();
        if guard.is_some() {
            return Err(VaultError::Status {
                operation: "collection create",
                status: StatusCode::CONFLICT,
            });
        }
        *guard = Some(Vec::new());
        Ok(())
    }

    async fn record_exists(&self, number: &str) -> Result<bool, VaultError> {
        let stale = self.stale_exists;
        self.with(|docs| !stale && docs.iter().any(|a| a.number == number))
    }

    async fn record_insert(&self, account: &Account) -> Result<(), VaultError> {
        self.with(|docs| {
            if docs.iter().any(|a| a.number == account.number) {
                return Err(VaultError::Conflict);
            }
            docs.push(account.clone());
            Ok(())
        })?
    }

    async fn records_query(&self, selector: &Selector) -> Result<Vec<Account>, VaultError> {
        self.with(|docs| match selector {
            Selector::Number(number) => docs
                .iter()
                .filter(|a| &a.number == number)
                .take(1)
                .cloned()
                .collect(),
            Selector::Direction(direction) => docs
                .iter()
                .filter(|a| a.direction == *direction)
                .take(DIRECTION_PAGE_SIZE as usize)
                .cloned()
                .collect(),
        })
    }
}
