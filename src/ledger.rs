//! Account ingest and lookup on top of a [`DocumentStore`].

use std::sync::Arc;

use thiserror::Error;

use crate::{
    models::{Account, AccountDraft, AccountQuery, SelectorError},
    validation::{self, AmountBounds, ValidationError},
    vault::{DocumentStore, VaultError},
};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("invalid account data: {0}")]
    Validation(#[from] ValidationError),

    #[error("invalid query: {0}")]
    InvalidQuery(#[from] SelectorError),

    #[error("account {0} already exists")]
    Duplicate(String),

    #[error("no matching accounts")]
    NotFound,

    #[error("collection state could not be confirmed")]
    CollectionUnconfirmed,

    #[error(transparent)]
    Store(#[from] VaultError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionState {
    Existing,
    Created,
}

pub struct Ledger {
    store: Arc<dyn DocumentStore>,
    bounds: AmountBounds,
}

impl Ledger {
    pub fn new(store: Arc<dyn DocumentStore>, bounds: AmountBounds) -> Self {
        Self { store, bounds }
    }

    /// Creates the collection only when the probe reports it missing.
    pub async fn ensure_collection(&self) -> Result<CollectionState, LedgerError> {
        match self.store.collection_exists().await {
            Ok(true) => {
                log::info!("collection exists");
                Ok(CollectionState::Existing)
            }
            Ok(false) => Err(LedgerError::CollectionUnconfirmed),
            Err(VaultError::CollectionNotFound) => {
                self.store.collection_create().await?;
                log::info!("collection created");
                Ok(CollectionState::Created)
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn add(&self, draft: AccountDraft) -> Result<Account, LedgerError> {
        let account = validation::validate_account(draft, &self.bounds)?;

        if self.store.record_exists(&account.number).await? {
            return Err(LedgerError::Duplicate(account.number));
        }

        // two writers can both pass the check above
        match self.store.record_insert(&account).await {
            Ok(()) => Ok(account),
            Err(VaultError::Conflict) => Err(LedgerError::Duplicate(account.number)),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn get(&self, query: &AccountQuery) -> Result<Vec<Account>, LedgerError> {
        let selector = query.selector()?;
        let accounts = self.store.records_query(&selector).await?;
        if accounts.is_empty() {
            return Err(LedgerError::NotFound);
        }
        Ok(accounts)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use reqwest::StatusCode;

    use super::*;
    use crate::{
        models::{Direction, Selector},
        vault::memory::MemoryStore,
    };

    fn draft(number: &str) -> AccountDraft {
        AccountDraft {
            number: number.into(),
            name: "Alice".into(),
            iban: "DE89370400440532013000".into(),
            address: "X".into(),
            amount: 50.0,
            direction: "sending".into(),
        }
    }

    fn query(number: &str, direction: &str) -> AccountQuery {
        AccountQuery {
            number: number.into(),
            direction: direction.into(),
        }
    }

    fn ledger(store: Arc<MemoryStore>) -> Ledger {
        Ledger::new(store, AmountBounds::default())
    }

    #[tokio::test]
    async fn creates_missing_collection() {
        let store = Arc::new(MemoryStore::default());
        let l = ledger(store.clone());
        assert_eq!(l.ensure_collection().await.unwrap(), CollectionState::Created);
        assert_eq!(l.ensure_collection().await.unwrap(), CollectionState::Existing);
    }

    #[tokio::test]
    async fn recreating_an_existing_collection_is_a_store_error() {
        let store = Arc::new(MemoryStore::with_collection());
        let err = store.collection_create().await.unwrap_err();
        assert!(matches!(
            err,
            VaultError::Status {
                status: StatusCode::CONFLICT,
                ..
            }
        ));
        assert!(!matches!(err, VaultError::Conflict));
    }

    /// Store whose probe fails for a reason other than absence.
    struct BrokenProbe;

    #[async_trait]
    impl DocumentStore for BrokenProbe {
        async fn collection_exists(&self) -> Result<bool, VaultError> {
            Err(VaultError::Status {
                operation: "collection probe",
                status: StatusCode::FORBIDDEN,
            })
        }
        async fn collection_create(&self) -> Result<(), VaultError> {
            panic!("must not provision after a failed probe")
        }
        async fn record_exists(&self, _: &str) -> Result<bool, VaultError> {
            unreachable!()
        }
        async fn record_insert(&self, _: &Account) -> Result<(), VaultError> {
            unreachable!()
        }
        async fn records_query(&self, _: &Selector) -> Result<Vec<Account>, VaultError> {
            unreachable!()
        }
    }

    #[tokio::test]
    async fn failed_probe_is_fatal() {
        let l = Ledger::new(Arc::new(BrokenProbe), AmountBounds::default());
        assert!(matches!(
            l.ensure_collection().await,
            Err(LedgerError::Store(VaultError::Status { .. }))
        ));
    }

    #[tokio::test]
    async fn duplicate_number_is_a_conflict() {
        let store = Arc::new(MemoryStore::with_collection());
        let l = ledger(store.clone());

        l.add(draft("A1")).await.unwrap();
        let mut second = draft("A1");
        second.name = "Mallory".into();
        second.direction = "receiving".into();

        assert!(matches!(
            l.add(second).await,
            Err(LedgerError::Duplicate(n)) if n == "A1"
        ));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn store_conflict_wins_over_stale_precheck() {
        let store = Arc::new(MemoryStore::with_collection().with_stale_exists());
        let l = ledger(store.clone());

        l.add(draft("A1")).await.unwrap();
        assert!(matches!(
            l.add(draft("A1")).await,
            Err(LedgerError::Duplicate(_))
        ));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn invalid_entry_never_reaches_the_store() {
        let store = Arc::new(MemoryStore::with_collection());
        let l = ledger(store.clone());

        let mut d = draft("A1");
        d.iban = "DE00370400440532013000".into();
        assert!(matches!(l.add(d).await, Err(LedgerError::Validation(_))));
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn amount_bounds_apply() {
        let store = Arc::new(MemoryStore::with_collection());
        let l = Ledger::new(
            store.clone(),
            AmountBounds {
                lower: Some(0.0),
                upper: None,
            },
        );
        let mut d = draft("A1");
        d.amount = -1.0;
        assert!(matches!(
            l.add(d).await,
            Err(LedgerError::Validation(ValidationError::Amount(_)))
        ));
    }

    #[tokio::test]
    async fn round_trip() {
        let store = Arc::new(MemoryStore::with_collection());
        let l = ledger(store);
        let stored = l.add(draft("100")).await.unwrap();

        let by_number = l.get(&query("100", "")).await.unwrap();
        assert_eq!(by_number, vec![stored.clone()]);

        let by_type = l.get(&query("", "sending")).await.unwrap();
        assert!(by_type.contains(&stored));
    }

    #[tokio::test]
    async fn number_takes_priority_over_type() {
        let store = Arc::new(MemoryStore::with_collection());
        let l = ledger(store);
        l.add(draft("100")).await.unwrap();

        let found = l.get(&query("100", "receiving")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].direction, Direction::Sending);
    }

    #[tokio::test]
    async fn unknown_number_is_not_found() {
        let store = Arc::new(MemoryStore::with_collection());
        let l = ledger(store);
        assert!(matches!(
            l.get(&query("404", "")).await,
            Err(LedgerError::NotFound)
        ));
    }

    #[tokio::test]
    async fn empty_or_bad_selector_is_rejected() {
        let l = ledger(Arc::new(MemoryStore::default()));
        // no collection: any store access would fail with a store error
        assert!(matches!(
            l.get(&query("", "")).await,
            Err(LedgerError::InvalidQuery(SelectorError::Empty))
        ));
        assert!(matches!(
            l.get(&query("", "both")).await,
            Err(LedgerError::InvalidQuery(SelectorError::Direction(_)))
        ));
    }
}
