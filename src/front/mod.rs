pub mod template;

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{de::DeserializeOwned, Serialize};
use tower_http::timeout::TimeoutLayer;

use crate::{
    config::Config,
    ledger::{Ledger, LedgerError},
    models::{AccountDraft, AccountQuery, Direction},
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct AppState {
    ledger: Arc<Ledger>,
    t: template::Template,
}

impl AppState {
    pub fn new(ledger: Ledger) -> anyhow::Result<Self> {
        let t = template::Template::new().context("failed to load templates")?;
        Ok(Self {
            ledger: Arc::new(ledger),
            t,
        })
    }
}

pub fn new_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/add", post(api_add))
        .route("/api/get", post(api_get))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .with_state(state)
}

pub async fn start_web_server(config: &Config, ledger: Ledger) -> anyhow::Result<()> {
    let app = new_router(AppState::new(ledger)?);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    log::info!("server listening on {}", config.listen_addr);
    axum::serve(listener, app).await.context("server error")
}

/// Error returned to HTTP callers. Only a generic message leaves the process;
/// the detail is logged when the error is built.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: &'static str,
}

impl ApiError {
    fn bad_request(err: serde_json::Error) -> Self {
        log::warn!("invalid request: {}", err);
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "invalid request",
        }
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        let (status, message) = match &err {
            LedgerError::Validation(e) => {
                log::warn!("invalid account data: {}", e);
                (StatusCode::BAD_REQUEST, "invalid account data")
            }
            LedgerError::InvalidQuery(e) => {
                log::warn!("invalid query: {}", e);
                (StatusCode::BAD_REQUEST, "invalid query")
            }
            LedgerError::Duplicate(number) => {
                log::warn!("account {} already exists", number);
                (StatusCode::CONFLICT, "account already exists")
            }
            LedgerError::NotFound => {
                log::info!("account not found");
                (StatusCode::NOT_FOUND, "account not found")
            }
            LedgerError::Store(e) => {
                log::error!("vault error: {} (retryable: {})", e, e.is_retryable());
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
            LedgerError::CollectionUnconfirmed => {
                log::error!("{}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        };
        Self { status, message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

/// Strict JSON body: unknown fields and type mismatches are a 400, whatever
/// the content type header says.
fn parse<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(ApiError::bad_request)
}

async fn index(State(s): State<AppState>) -> Response {
    #[derive(Serialize)]
    struct Ctx {
        directions: Vec<&'static str>,
    }

    s.t.render(
        "index.hbs",
        &Ctx {
            directions: Direction::ALL.iter().map(Direction::as_str).collect(),
        },
    )
}

#[axum::debug_handler]
async fn api_add(State(s): State<AppState>, body: Bytes) -> Result<StatusCode, ApiError> {
    log::info!("received request to add account");
    let draft: AccountDraft = parse(&body)?;
    let account = s.ledger.add(draft).await?;
    log::info!("account {} added", account.number);
    Ok(StatusCode::OK)
}

#[axum::debug_handler]
async fn api_get(State(s): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let query: AccountQuery = parse(&body)?;
    let accounts = s.ledger.get(&query).await?;
    log::info!("{} account(s) retrieved", accounts.len());
    Ok(Json(accounts).into_response())
}
