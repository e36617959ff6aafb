//! HTTP client for the remote inventory API.

mod payload;

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::config::{ClientConfig, CompanyField};
use crate::models::{Item, NewItem, Registration};
use crate::util::{compact_text, normalize_text_option};

pub use payload::{
    parse_company_list, parse_created_item, parse_error_message, parse_location_list,
    parse_search_payload, SignUpReply,
};

const CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid API configuration: {0}")]
    InvalidConfiguration(String),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Inventory API returned HTTP {status}{}", detail_suffix(.message.as_deref()))]
    Status {
        status: u16,
        message: Option<String>,
    },
    #[error("Malformed response payload: {0}")]
    MalformedPayload(String),
    #[error("Request was cancelled")]
    Cancelled,
}

impl ApiError {
    /// Cancellation means a newer request superseded this one. It is not a failure.
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Message the server put in its error body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

fn detail_suffix(message: Option<&str>) -> String {
    message.map_or_else(String::new, |message| format!(": {message}"))
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Backend that can answer incremental name lookups.
///
/// The search controller only needs this one call, so tests and alternative
/// transports can stand in for the HTTP client.
pub trait ItemLookup: Send + Sync + 'static {
    fn search_items(
        &self,
        name: &str,
        limit: usize,
        cancel: CancellationToken,
    ) -> impl Future<Output = ApiResult<Vec<Item>>> + Send;
}

/// Authenticated client for the inventory endpoints.
///
/// The bearer token is captured once at construction; there is no refresh.
#[derive(Clone)]
pub struct InventoryClient {
    base_url: String,
    token: Option<String>,
    company_field: CompanyField,
    client: Client,
}

impl std::fmt::Debug for InventoryClient {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("InventoryClient")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("company_field", &self.company_field)
            .finish_non_exhaustive()
    }
}

impl InventoryClient {
    pub fn new(config: &ClientConfig, token: Option<String>) -> ApiResult<Self> {
        let base_url = crate::config::normalize_base_url(&config.api_base_url)
            .map_err(|error| ApiError::InvalidConfiguration(error.to_string()))?;

        Ok(Self {
            base_url,
            token: normalize_text_option(token),
            company_field: config.company_field,
            client: Client::builder()
                .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
                .build()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub const fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Look up at most `limit` items whose name contains `name`.
    pub async fn search(
        &self,
        name: &str,
        limit: usize,
        cancel: CancellationToken,
    ) -> ApiResult<Vec<Item>> {
        let path = format!("/item/amount/{limit}/name/{}", urlencoding::encode(name));
        tracing::debug!("Item lookup for {:?} (limit {})", name, limit);

        let request = self.get(&path);
        let body = run_cancellable(&cancel, send_for_body(request)).await?;
        parse_search_payload(&body, self.company_field)
    }

    /// Known manufacturer names.
    pub async fn list_companies(&self, cancel: CancellationToken) -> ApiResult<Vec<String>> {
        let request = self.get("/company");
        let body = run_cancellable(&cancel, send_for_body(request)).await?;
        parse_company_list(&body)
    }

    /// Known storage locations.
    pub async fn list_locations(&self, cancel: CancellationToken) -> ApiResult<Vec<String>> {
        let request = self.get("/location");
        let body = run_cancellable(&cancel, send_for_body(request)).await?;
        parse_location_list(&body)
    }

    /// Create an inventory record. Returns the created item when the server echoes it.
    pub async fn create_item(
        &self,
        item: &NewItem,
        cancel: CancellationToken,
    ) -> ApiResult<Option<Item>> {
        let request = self.authorized(
            self.client
                .post(format!("{}/item", self.base_url))
                .json(item),
        );
        let body = run_cancellable(&cancel, send_for_body(request)).await?;
        let created = parse_created_item(&body, self.company_field)?;
        tracing::info!("Created inventory item {:?}", item.name);
        Ok(created)
    }

    /// Register a new account. Signup is unauthenticated.
    pub async fn sign_up(
        &self,
        registration: &Registration,
        cancel: CancellationToken,
    ) -> ApiResult<SignUpReply> {
        let request = self
            .client
            .post(format!("{}/auth/signup", self.base_url))
            .header(reqwest::header::ACCEPT, "application/json")
            .json(registration);
        let body = run_cancellable(&cancel, send_for_body(request)).await?;
        serde_json::from_str(&body).map_err(|error| {
            ApiError::MalformedPayload(format!("unexpected signup reply: {error}"))
        })
    }

    /// JSON GET against the API.
    fn get(&self, path: &str) -> RequestBuilder {
        self.authorized(self.client.get(format!("{}{path}", self.base_url)))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header(reqwest::header::ACCEPT, "application/json");
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

impl ItemLookup for InventoryClient {
    fn search_items(
        &self,
        name: &str,
        limit: usize,
        cancel: CancellationToken,
    ) -> impl Future<Output = ApiResult<Vec<Item>>> + Send {
        self.search(name, limit, cancel)
    }
}

/// Race `operation` against `cancel`.
///
/// When the token fires first the operation future is dropped, which aborts
/// the underlying connection instead of leaving it to finish unobserved.
pub async fn run_cancellable<T, F>(cancel: &CancellationToken, operation: F) -> ApiResult<T>
where
    F: Future<Output = ApiResult<T>>,
{
    if cancel.is_cancelled() {
        return Err(ApiError::Cancelled);
    }
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(ApiError::Cancelled),
        result = operation => result,
    }
}

async fn send_for_body(request: RequestBuilder) -> ApiResult<String> {
    let response = request.send().await?;
    read_success_body(response).await
}

async fn read_success_body(response: Response) -> ApiResult<String> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.text().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let message = parse_error_message(&body).or_else(|| {
        let compact = compact_text(&body);
        (!compact.is_empty() && !compact.starts_with('<')).then_some(compact)
    });
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}
