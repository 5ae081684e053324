//! Resource repository.
//!
//! Sends built queries and payloads for one named resource through a
//! [`Transport`]. The transport owns everything HTTP: URL resolution,
//! headers, status handling. The repository only shapes requests and
//! expands dotted validation errors on failed writes.
//!
//! ```rust,ignore
//! let posts = ApiRepository::new("posts", transport);
//!
//! let page = posts
//!     .index_with(|q| q.select(["id", "title"]).with("author"))
//!     .await?;
//!
//! match posts.store(&json!({ "title": "" })).await {
//!     Err(ApiError::Response { payload, .. }) => render(&payload["errors"]),
//!     other => { other?; }
//! }
//! ```

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::{ApiConfig, ParamNames};
use crate::error::{ApiError, ApiResult};
use crate::expander::rewrite_errors;
use crate::params::{to_query_string, ToParams};
use crate::query::QueryBuilder;

/// HTTP method a transport should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
        }
    }
}

/// Resource action, named after the conventional controller methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Index,
    Show,
    Store,
    Update,
}

impl Action {
    pub fn method(&self) -> Method {
        match self {
            Action::Index | Action::Show => Method::Get,
            Action::Store => Method::Post,
            Action::Update => Method::Put,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Index => write!(f, "index"),
            Action::Show => write!(f, "show"),
            Action::Store => write!(f, "store"),
            Action::Update => write!(f, "update"),
        }
    }
}

/// A request handed to the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub resource: String,
    pub action: Action,
    /// Record id for `show` and `update`.
    pub id: Option<u64>,
    /// Query parameters (reads only).
    pub params: Map<String, Value>,
    /// JSON body (writes only).
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn method(&self) -> Method {
        self.action.method()
    }

    /// Parameters in bracket notation, ready to append to a URL.
    pub fn query_string(&self) -> String {
        to_query_string(&self.params)
    }
}

/// A successful response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub data: Value,
}

/// Failure reported by a transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request never got a response.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a failure status.
    #[error("Status {status}")]
    Status { status: u16, payload: Value },
}

/// Sends requests to the backend.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// Typed access to one backend resource.
pub struct ApiRepository<T> {
    resource: String,
    transport: T,
    names: ParamNames,
}

impl<T: Transport> ApiRepository<T> {
    /// Repository using the default parameter names.
    pub fn new(resource: impl Into<String>, transport: T) -> Self {
        Self::with_config(resource, transport, &ApiConfig::default())
    }

    pub fn with_config(resource: impl Into<String>, transport: T, config: &ApiConfig) -> Self {
        Self {
            resource: resource.into(),
            transport,
            names: config.param_names.clone(),
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// List records matching `query`.
    pub async fn index(&self, query: &QueryBuilder) -> ApiResult<ApiResponse> {
        let request = self.read_request(Action::Index, None, query)?;
        self.dispatch(request).await
    }

    pub async fn index_with<F>(&self, callback: F) -> ApiResult<ApiResponse>
    where
        F: FnOnce(QueryBuilder) -> QueryBuilder,
    {
        let query = callback(QueryBuilder::new());
        self.index(&query).await
    }

    /// Fetch one record, with the columns and relationships in `query`.
    pub async fn show(&self, id: u64, query: &QueryBuilder) -> ApiResult<ApiResponse> {
        let request = self.read_request(Action::Show, Some(id), query)?;
        self.dispatch(request).await
    }

    pub async fn show_with<F>(&self, id: u64, callback: F) -> ApiResult<ApiResponse>
    where
        F: FnOnce(QueryBuilder) -> QueryBuilder,
    {
        let query = callback(QueryBuilder::new());
        self.show(id, &query).await
    }

    /// Create a record. Validation errors come back nested.
    pub async fn store(&self, data: &Value) -> ApiResult<ApiResponse> {
        let request = self.write_request(Action::Store, None, data);
        self.dispatch(request).await
    }

    /// Update a record. Validation errors come back nested.
    pub async fn update(&self, id: u64, data: &Value) -> ApiResult<ApiResponse> {
        let request = self.write_request(Action::Update, Some(id), data);
        self.dispatch(request).await
    }

    fn read_request(
        &self,
        action: Action,
        id: Option<u64>,
        query: &QueryBuilder,
    ) -> ApiResult<ApiRequest> {
        Ok(ApiRequest {
            resource: self.resource.clone(),
            action,
            id,
            params: query.to_params(&self.names)?,
            body: None,
        })
    }

    fn write_request(&self, action: Action, id: Option<u64>, data: &Value) -> ApiRequest {
        ApiRequest {
            resource: self.resource.clone(),
            action,
            id,
            params: Map::new(),
            body: Some(data.clone()),
        }
    }

    async fn dispatch(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let action = request.action;
        tracing::debug!("{} {}.{} {:?}", request.method(), self.resource, action, request.id);

        match self.transport.send(request).await {
            Ok(response) => Ok(response),
            Err(TransportError::Network(message)) => {
                tracing::debug!("{}.{} failed: {}", self.resource, action, message);
                Err(ApiError::Transport(message))
            }
            Err(TransportError::Status { status, mut payload }) => {
                if matches!(action, Action::Store | Action::Update) {
                    if let Err(e) = rewrite_errors(&mut payload) {
                        tracing::warn!(
                            "Leaving errors of {}.{} unexpanded: {}",
                            self.resource,
                            action,
                            e
                        );
                    }
                }
                Err(ApiError::Response { status, payload })
            }
        }
    }
}
