mod config;
mod front;
mod ledger;
pub mod models;
mod validation;
mod vault;

use std::sync::Arc;

use anyhow::Context;
use env_logger::Env;

use crate::{config::Config, ledger::Ledger, vault::VaultClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::try_init_from_env(Env::default().default_filter_or("ledgervault=info"))?;

    let config = Config::from_env().context("failed to read environment")?;
    log::info!("environment read successfully");

    let vault = VaultClient::new(&config.vault).context("failed to build vault client")?;
    let ledger = Ledger::new(Arc::new(vault), config.amount_bounds);
    ledger
        .ensure_collection()
        .await
        .context("failed to prepare vault collection")?;

    front::start_web_server(&config, ledger).await
}
