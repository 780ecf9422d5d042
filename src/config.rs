//! Startup configuration read from the process environment.
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `PORT` | HTTP listen port | required |
//! | `API_KEY` | vault key allowed to write documents | required |
//! | `API_RO_KEY` | read-only vault key | required |
//! | `API_URL` | vault collection endpoint | required |
//! | `VAULT_TIMEOUT_SECS` | timeout for every vault request | `5` |
//! | `AMOUNT_MIN` / `AMOUNT_MAX` | inclusive amount bounds | unbounded |

use std::{
    net::{Ipv4Addr, SocketAddr},
    str::FromStr,
    time::Duration,
};

use thiserror::Error;

use crate::validation::AmountBounds;

const DEFAULT_VAULT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("invalid value for {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

/// Connection settings for the vault collection.
#[derive(Debug, Clone)]
pub struct VaultConfig {
    pub url: String,
    pub api_key: String,
    pub read_only_key: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub vault: VaultConfig,
    pub amount_bounds: AmountBounds,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source. Empty values
    /// are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let port: u16 = parse("PORT", &required("PORT")?)?;
        let api_key = required("API_KEY")?;
        let read_only_key = required("API_RO_KEY")?;
        let url = required("API_URL")?;

        let timeout_secs = match get("VAULT_TIMEOUT_SECS") {
            Some(v) => parse("VAULT_TIMEOUT_SECS", &v)?,
            None => DEFAULT_VAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "VAULT_TIMEOUT_SECS",
                message: "must be greater than zero".into(),
            });
        }

        let amount_bounds = AmountBounds {
            lower: get("AMOUNT_MIN")
                .map(|v| parse("AMOUNT_MIN", &v))
                .transpose()?,
            upper: get("AMOUNT_MAX")
                .map(|v| parse("AMOUNT_MAX", &v))
                .transpose()?,
        };
        if let (Some(lower), Some(upper)) = (amount_bounds.lower, amount_bounds.upper) {
            if lower > upper {
                return Err(ConfigError::Invalid {
                    field: "AMOUNT_MIN",
                    message: format!("{lower} is greater than AMOUNT_MAX {upper}"),
                });
            }
        }

        Ok(Self {
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)),
            vault: VaultConfig {
                url,
                api_key,
                read_only_key,
                timeout: Duration::from_secs(timeout_secs),
            },
            amount_bounds,
        })
    }
}

fn parse<T>(field: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        field,
        message: e.to_string(),
    })
}
