use async_trait::async_trait;
use reqwest::{
    header::{ACCEPT, CONTENT_TYPE},
    Method, RequestBuilder, Response, StatusCode,
};
use serde::de::DeserializeOwned;

use super::{
    dto::{CollectionSchema, CountRequest, CountResponse, Query, SearchRequest, SearchResponse},
    Access, DocumentStore, VaultError, DIRECTION_PAGE_SIZE,
};
use crate::{
    config::VaultConfig,
    models::{Account, Selector},
};

const API_KEY_HEADER: &str = "X-API-Key";
const JSON: &str = "application/json";

/// HTTP client for one vault collection.
#[derive(Debug, Clone)]
pub struct VaultClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    read_only_key: String,
}

impl VaultClient {
    pub fn new(config: &VaultConfig) -> Result<Self, VaultError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            read_only_key: config.read_only_key.clone(),
        })
    }

    fn request(&self, method: Method, endpoint: &str, access: Access) -> RequestBuilder {
        let key = match access {
            Access::ReadWrite => &self.api_key,
            Access::ReadOnly => &self.read_only_key,
        };
        log::debug!("vault {} {}{} ({:?})", method, self.base_url, endpoint, access);
        self.http
            .request(method, format!("{}{}", self.base_url, endpoint))
            .header(ACCEPT, JSON)
            .header(CONTENT_TYPE, JSON)
            .header(API_KEY_HEADER, key)
    }
}

fn expect_ok(operation: &'static str, resp: &Response) -> Result<(), VaultError> {
    match resp.status() {
        StatusCode::OK => Ok(()),
        status => Err(VaultError::Status { operation, status }),
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, VaultError> {
    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait]
impl DocumentStore for VaultClient {
    async fn collection_exists(&self) -> Result<bool, VaultError> {
        let resp = self
            .request(Method::GET, "", Access::ReadOnly)
            .send()
            .await?;

        match resp.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Err(VaultError::CollectionNotFound),
            status => Err(VaultError::Status {
                operation: "collection probe",
                status,
            }),
        }
    }

    async fn collection_create(&self) -> Result<(), VaultError> {
        let resp = self
            .request(Method::PUT, "", Access::ReadWrite)
            .json(&CollectionSchema::accounts())
            .send()
            .await?;
        expect_ok("collection create", &resp)
    }

    async fn record_exists(&self, number: &str) -> Result<bool, VaultError> {
        let resp = self
            .request(Method::POST, "/documents/count", Access::ReadOnly)
            .json(&CountRequest {
                query: Query::field_eq("number", number),
            })
            .send()
            .await?;
        expect_ok("document count", &resp)?;

        let count: CountResponse = decode(resp).await?;
        Ok(count.count > 0)
    }

    async fn record_insert(&self, account: &Account) -> Result<(), VaultError> {
        let resp = self
            .request(Method::PUT, "/document", Access::ReadWrite)
            .json(account)
            .send()
            .await?;

        match resp.status() {
            StatusCode::CONFLICT => Err(VaultError::Conflict),
            status if status.is_success() => Ok(()),
            status => Err(VaultError::Status {
                operation: "document insert",
                status,
            }),
        }
    }

    async fn records_query(&self, selector: &Selector) -> Result<Vec<Account>, VaultError> {
        let body = match selector {
            Selector::Direction(direction) => SearchRequest {
                page: 1,
                per_page: DIRECTION_PAGE_SIZE,
                query: Query::field_eq("type", direction.as_str()),
            },
            Selector::Number(number) => SearchRequest {
                page: 1,
                per_page: 1,
                query: Query::field_eq("number", number),
            },
        };

        let resp = self
            .request(Method::POST, "/documents/search", Access::ReadOnly)
            .json(&body)
            .send()
            .await?;
        expect_ok("document search", &resp)?;

        let result: SearchResponse = decode(resp).await?;
        Ok(result
            .revisions
            .into_iter()
            .map(|revision| revision.document)
            .collect())
    }
}
