//! Access to the immudb Vault collection that stores accounts.
//!
//! [`DocumentStore`] is the seam the ledger talks to; [`VaultClient`] is the
//! HTTP implementation. Nothing outside this module issues network requests.

mod client;
mod dto;
#[cfg(test)]
pub mod memory;

pub use client::VaultClient;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use crate::models::{Account, Selector};

/// Page size used when listing accounts by direction.
pub const DIRECTION_PAGE_SIZE: u32 = 100;

#[derive(Debug, Error)]
pub enum VaultError {
    /// The collection probe answered 404.
    #[error("collection not found")]
    CollectionNotFound,

    /// The write was refused by the unique index on `number`.
    #[error("document conflicts with an existing record")]
    Conflict,

    #[error("{operation} failed with status {status}")]
    Status {
        operation: &'static str,
        status: StatusCode,
    },

    #[error("vault request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed vault response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl VaultError {
    pub fn is_retryable(&self) -> bool {
        match self {
            VaultError::Transport(e) => e.is_timeout() || e.is_connect(),
            VaultError::Status { status, .. } => status.is_server_error(),
            _ => false,
        }
    }
}

/// Which vault credential a request is sent with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ReadWrite,
    ReadOnly,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// A missing collection is [`VaultError::CollectionNotFound`].
    async fn collection_exists(&self) -> Result<bool, VaultError>;

    async fn collection_create(&self) -> Result<(), VaultError>;

    async fn record_exists(&self, number: &str) -> Result<bool, VaultError>;

    /// A unique index violation is [`VaultError::Conflict`].
    async fn record_insert(&self, account: &Account) -> Result<(), VaultError>;

    async fn records_query(&self, selector: &Selector) -> Result<Vec<Account>, VaultError>;
}
