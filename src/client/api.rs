//! Reservation backend HTTP client.
//!
//! [`ApiClient`] turns the five logical operations into HTTP calls against
//! the configured endpoint table. Every response goes through the same
//! normalization: a non-2xx status becomes `API {status}: {body}`.

use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;
use uuid::Uuid;

use crate::client::observer::{
    ErrorEvent, Operation, RequestEvent, RequestObserver, ResponseEvent, TracingObserver,
};
use crate::client::response::{decode_json, decode_json_or_null, read_success_body};
use crate::config::{
    ApiConfig, Config, CredentialsPolicy, DbStatusMode, Endpoint, EndpointsConfig, TimeoutConfig,
    ID_PLACEHOLDER,
};
use crate::error::{Error, Result};

/// Message carried by every demo-mode payload.
pub const DEMO_MESSAGE: &str = "Demo mode: no backend is configured, nothing was sent";

/// HTTP client for a reservation backend.
///
/// Cheap to clone; clones share the connection pool and observer.
#[derive(Clone)]
pub struct ApiClient {
    /// HTTP client.
    client: Client,
    /// Normalized base URL; `None` in demo mode.
    base_url: Option<String>,
    /// Header carrying the credential.
    credential_header: HeaderName,
    /// Credential value, marked sensitive.
    credential: Option<HeaderValue>,
    /// Endpoint table.
    endpoints: EndpointsConfig,
    /// Database status strategy.
    db_status: DbStatusMode,
    /// Per-request timeout.
    timeout: Duration,
    /// Delay before a demo-mode answer.
    demo_delay: Duration,
    /// Event sink.
    observer: Arc<dyn RequestObserver>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("credential_header", &self.credential_header)
            .field("has_credential", &self.credential.is_some())
            .field("endpoints", &self.endpoints)
            .field("db_status", &self.db_status)
            .field("timeout", &self.timeout)
            .field("demo_delay", &self.demo_delay)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a client from the API and timeout sections.
    ///
    /// Events go to the [`TracingObserver`].
    pub fn new(api: &ApiConfig, timeout: &TimeoutConfig) -> Result<Self> {
        api.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(concat!("rendezvous/", env!("CARGO_PKG_VERSION")))
            .cookie_store(api.credentials == CredentialsPolicy::Include)
            .build()
            .map_err(|e| Error::config_with_source("Failed to create HTTP client", e))?;

        let credential_header = HeaderName::from_bytes(api.credential_header.as_bytes())
            .map_err(|e| Error::config_with_source("Invalid credential header name", e))?;

        let credential = api
            .credential()
            .map(|credential| {
                HeaderValue::from_str(credential)
                    .map(|mut value| {
                        value.set_sensitive(true);
                        value
                    })
                    .map_err(|e| {
                        Error::config_with_source("Credential is not a valid header value", e)
                    })
            })
            .transpose()?;

        Ok(Self {
            client,
            base_url: api.base_url().map(str::to_string),
            credential_header,
            credential,
            endpoints: api.endpoints.clone(),
            db_status: api.db_status,
            timeout: timeout.http(),
            demo_delay: timeout.demo_delay(),
            observer: Arc::new(TracingObserver),
        })
    }

    /// Creates a client from the full configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api, &config.timeout)
    }

    /// Replaces the observer.
    pub fn with_observer(mut self, observer: Arc<dyn RequestObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Returns the normalized base URL, or `None` in demo mode.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Returns true when no backend is configured.
    pub fn is_demo(&self) -> bool {
        self.base_url.is_none()
    }

    /// Checks that the backend answers its health endpoint.
    ///
    /// Returns `true` only for a 2xx response with a JSON body. Never fails.
    pub async fn check_health(&self) -> bool {
        self.check(Operation::Health, &self.endpoints.health).await
    }

    /// Checks that the backend reaches its database.
    ///
    /// Depending on configuration this calls the dedicated endpoint or reuses
    /// the health check, on the assumption that the backend cannot report
    /// healthy without its data store. Never fails.
    pub async fn check_database_status(&self) -> bool {
        match self.db_status {
            DbStatusMode::Endpoint => {
                self.check(Operation::DbStatus, &self.endpoints.db_status)
                    .await
            }
            DbStatusMode::HealthProxy => {
                debug!("Database status proxied through the health check");
                self.check(Operation::DbStatus, &self.endpoints.health).await
            }
        }
    }

    /// Creates a reservation and returns the backend's JSON answer verbatim.
    ///
    /// In demo mode this resolves after the demo delay with a synthetic
    /// payload and never fails.
    pub async fn create_reservation<P>(&self, payload: &P) -> Result<Value>
    where
        P: Serialize + ?Sized,
    {
        if self.is_demo() {
            let data = serde_json::to_value(payload).ok();
            return Ok(self
                .demo(
                    Operation::Create,
                    json!({
                        "success": true,
                        "demo": true,
                        "message": DEMO_MESSAGE,
                        "id": Uuid::new_v4().to_string(),
                        "createdAt": Utc::now().to_rfc3339(),
                        "data": data,
                    }),
                )
                .await);
        }

        let body = serde_json::to_vec(payload)?;
        let endpoint = &self.endpoints.create;
        let (url, text) = self
            .execute(Operation::Create, Method::POST, endpoint, &endpoint.path, Some(body))
            .await?;
        self.decode(Operation::Create, &url, &text)
    }

    /// Lists reservations and returns the backend's JSON answer verbatim.
    pub async fn list_reservations(&self) -> Result<Value> {
        let endpoint = &self.endpoints.list;
        let (url, text) = self
            .execute(Operation::List, Method::GET, endpoint, &endpoint.path, None)
            .await?;
        self.decode(Operation::List, &url, &text)
    }

    /// Deletes a reservation and returns the backend's confirmation verbatim.
    ///
    /// In demo mode this resolves after the demo delay with a synthetic
    /// confirmation.
    pub async fn delete_reservation(&self, id: &str) -> Result<Value> {
        if id.trim().is_empty() {
            let err = Error::invalid_request("reservation id must not be empty");
            self.report(Operation::Delete, None, &err);
            return Err(err);
        }

        if self.is_demo() {
            return Ok(self
                .demo(
                    Operation::Delete,
                    json!({
                        "success": true,
                        "demo": true,
                        "message": DEMO_MESSAGE,
                        "id": id,
                    }),
                )
                .await);
        }

        let endpoint = &self.endpoints.delete;
        let path = endpoint
            .path
            .replace(ID_PLACEHOLDER, &urlencoding::encode(id));
        let (url, text) = self
            .execute(Operation::Delete, Method::DELETE, endpoint, &path, None)
            .await?;
        self.decode(Operation::Delete, &url, &text)
    }

    /// Runs a soft check: any failure is reported and becomes `false`.
    async fn check(&self, operation: Operation, endpoint: &Endpoint) -> bool {
        if self.is_demo() {
            debug!(operation = %operation, "No backend URL configured, check skipped");
            return false;
        }

        let result = match self
            .execute(operation, Method::GET, endpoint, &endpoint.path, None)
            .await
        {
            Ok((url, text)) => decode_json(&url, &text).map_err(|e| (url, e)),
            // Already reported by execute.
            Err(_) => return false,
        };

        match result {
            Ok(_) => true,
            Err((url, e)) => {
                self.report(operation, Some(&url), &e);
                false
            }
        }
    }

    /// Sends one request and returns the URL and the body of a 2xx answer.
    ///
    /// Every failure is reported to the observer before it is returned.
    async fn execute(
        &self,
        operation: Operation,
        method: Method,
        endpoint: &Endpoint,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<(String, String)> {
        let base_url = match &self.base_url {
            Some(base_url) => base_url,
            None => {
                let err = Error::config(format!(
                    "api.base_url is not configured, cannot run {}",
                    operation
                ));
                self.report(operation, None, &err);
                return Err(err);
            }
        };

        if endpoint.requires_credential && self.credential.is_none() {
            let err = Error::config(format!(
                "{} requires a credential in the {} header, but none is configured",
                operation, self.credential_header
            ));
            self.report(operation, None, &err);
            return Err(err);
        }

        let url = format!("{}{}", base_url, path);

        self.observer.on_request(&RequestEvent {
            operation,
            method: &method,
            url: &url,
            body: body.as_deref(),
        });

        let mut request = self.client.request(method, &url).timeout(self.timeout);
        if let Some(credential) = &self.credential {
            request = request.header(self.credential_header.clone(), credential.clone());
        }
        if let Some(body) = body {
            request = request.body(body);
        }

        let started = Instant::now();
        let result = match request.send().await {
            Ok(response) => {
                self.observer.on_response(&ResponseEvent {
                    operation,
                    url: &url,
                    status: response.status(),
                    elapsed: started.elapsed(),
                });
                read_success_body(&url, self.timeout.as_secs(), response).await
            }
            Err(e) => Err(Error::from_transport(&url, self.timeout.as_secs(), e)),
        };

        match result {
            Ok(text) => Ok((url, text)),
            Err(e) => {
                self.report(operation, Some(&url), &e);
                Err(e)
            }
        }
    }

    /// Decodes a success body for a hard-failure operation.
    fn decode(&self, operation: Operation, url: &str, text: &str) -> Result<Value> {
        decode_json_or_null(url, text).inspect_err(|e| self.report(operation, Some(url), e))
    }

    /// Answers locally after the demo delay.
    async fn demo(&self, operation: Operation, payload: Value) -> Value {
        self.observer.on_demo(operation);
        tokio::time::sleep(self.demo_delay).await;
        payload
    }

    fn report(&self, operation: Operation, url: Option<&str>, error: &Error) {
        self.observer.on_error(&ErrorEvent {
            operation,
            url,
            error,
        });
    }
}
