//! Backend API configuration types.
//!
//! Contains the base URL, the optional credential forwarded as a header, and
//! the endpoint table consumed by the client.

use reqwest::header::HeaderName;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::Error;

/// Default header carrying the secondary credential.
pub const DEFAULT_CREDENTIAL_HEADER: &str = "X-Mongo-URI";

/// Placeholder substituted with the reservation id in the delete path.
pub const ID_PLACEHOLDER: &str = "{id}";

/// Backend API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the backend. Absent or empty selects demo mode.
    pub base_url: Option<String>,

    /// Secondary credential string forwarded on every request.
    pub credential: Option<String>,

    /// Header name used to forward the credential.
    pub credential_header: String,

    /// Whether cookies set by the backend are kept and sent back.
    pub credentials: CredentialsPolicy,

    /// How the database status is determined.
    pub db_status: DbStatusMode,

    /// Endpoint table.
    pub endpoints: EndpointsConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            credential: None,
            credential_header: DEFAULT_CREDENTIAL_HEADER.to_string(),
            credentials: CredentialsPolicy::Include,
            db_status: DbStatusMode::Endpoint,
            endpoints: EndpointsConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Returns the normalized base URL, or `None` in demo mode.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url
            .as_deref()
            .map(|url| url.trim().trim_end_matches('/'))
            .filter(|url| !url.is_empty())
    }

    /// Returns the credential, ignoring blank values.
    pub fn credential(&self) -> Option<&str> {
        self.credential
            .as_deref()
            .filter(|credential| !credential.trim().is_empty())
    }

    /// Returns true when no backend is configured.
    pub fn is_demo(&self) -> bool {
        self.base_url().is_none()
    }

    /// Validates the API section.
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if let Some(base_url) = self.base_url() {
            let parsed = Url::parse(base_url).map_err(|e| {
                Error::config_with_source(format!("api.base_url '{}' is not a valid URL", base_url), e)
            })?;
            if parsed.scheme() != "http" && parsed.scheme() != "https" {
                return Err(Error::config(format!(
                    "api.base_url must use http or https, got '{}'",
                    parsed.scheme()
                )));
            }
        }

        HeaderName::from_bytes(self.credential_header.as_bytes()).map_err(|e| {
            Error::config_with_source(
                format!(
                    "api.credential_header '{}' is not a valid header name",
                    self.credential_header
                ),
                e,
            )
        })?;

        for (name, endpoint) in self.endpoints.iter() {
            if !endpoint.path.starts_with('/') {
                return Err(Error::config(format!(
                    "api.endpoints.{}.path must start with '/'",
                    name
                )));
            }
        }

        if !self.endpoints.delete.path.contains(ID_PLACEHOLDER) {
            return Err(Error::config(format!(
                "api.endpoints.delete.path must contain '{}'",
                ID_PLACEHOLDER
            )));
        }

        Ok(())
    }
}

/// A single backend endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Path appended to the base URL.
    pub path: String,

    /// Fail before sending when no credential is configured.
    #[serde(default)]
    pub requires_credential: bool,
}

impl Endpoint {
    /// Creates an endpoint that does not require the credential.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            requires_credential: false,
        }
    }

    /// Creates an endpoint that requires the credential.
    pub fn with_credential(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            requires_credential: true,
        }
    }
}

/// Endpoint table for every client operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    /// Health check.
    pub health: Endpoint,
    /// Dedicated database status check.
    pub db_status: Endpoint,
    /// Create a reservation.
    pub create: Endpoint,
    /// List reservations.
    pub list: Endpoint,
    /// Delete a reservation; the path contains `{id}`.
    pub delete: Endpoint,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            health: Endpoint::new("/health"),
            db_status: Endpoint::new("/api/db-status"),
            create: Endpoint::new("/api/appointments"),
            list: Endpoint::new("/api/appointments"),
            delete: Endpoint::new("/api/appointments/{id}"),
        }
    }
}

impl EndpointsConfig {
    /// Endpoint table of backends that create through `/api/reservations`
    /// and expect the credential header.
    pub fn reservations() -> Self {
        Self {
            create: Endpoint::with_credential("/api/reservations"),
            ..Self::default()
        }
    }

    /// Iterates over `(name, endpoint)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Endpoint)> {
        [
            ("health", &self.health),
            ("db_status", &self.db_status),
            ("create", &self.create),
            ("list", &self.list),
            ("delete", &self.delete),
        ]
        .into_iter()
    }
}

/// Cookie handling policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialsPolicy {
    /// Keep cookies set by the backend and send them back.
    #[default]
    Include,
    /// Never send cookies.
    Omit,
}

impl FromStr for CredentialsPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "include" => Ok(CredentialsPolicy::Include),
            "omit" => Ok(CredentialsPolicy::Omit),
            _ => Err(Error::config(format!("Unknown credentials policy: {}", s))),
        }
    }
}

/// Source of the database status signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DbStatusMode {
    /// Call the dedicated database status endpoint.
    #[default]
    Endpoint,
    /// Reuse the health check as a proxy.
    HealthProxy,
}

impl FromStr for DbStatusMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "endpoint" => Ok(DbStatusMode::Endpoint),
            "health_proxy" | "health" => Ok(DbStatusMode::HealthProxy),
            _ => Err(Error::config(format!("Unknown db status mode: {}", s))),
        }
    }
}
