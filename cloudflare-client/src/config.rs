//! Client configuration
//!
//! A [`ClientConfig`] is built once, validated, and then shared read-only by
//! every pipeline stage for the lifetime of the client.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};
use crate::utils::log_sanitizer::mask_secret;

/// Base URL of the v4 API.
pub const API_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

/// Largest `per_page` accepted by list endpoints.
pub const MAX_ITEMS_PER_PAGE: u32 = 100;

const DEFAULT_ITEMS_PER_PAGE: u32 = 100;
const DEFAULT_MAX_RETRIES: u32 = 1;
const DEFAULT_AUTO_PAGINATION_CONCURRENCY: usize = 1;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1000);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const ENV_API_TOKEN: &str = "CLOUDFLARE_API_TOKEN";
const ENV_API_KEY: &str = "CLOUDFLARE_API_KEY";
const ENV_EMAIL: &str = "CLOUDFLARE_EMAIL";

// ============ Authentication ============

/// How requests authenticate.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AuthMode {
    /// `Authorization: Bearer <token>`.
    Token { token: String },
    /// Global API key: `X-Auth-Key` plus `X-Auth-Email`.
    Legacy { key: String, email: String },
}

impl fmt::Debug for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token { token } => f
                .debug_struct("Token")
                .field("token", &mask_secret(token))
                .finish(),
            Self::Legacy { key, email } => f
                .debug_struct("Legacy")
                .field("key", &mask_secret(key))
                .field("email", email)
                .finish(),
        }
    }
}

impl AuthMode {
    pub fn token(token: impl Into<String>) -> Self {
        Self::Token {
            token: token.into(),
        }
    }

    pub fn legacy(key: impl Into<String>, email: impl Into<String>) -> Self {
        Self::Legacy {
            key: key.into(),
            email: email.into(),
        }
    }

    fn check(&self) -> Result<()> {
        let missing = match self {
            Self::Token { token } if token.trim().is_empty() => Some("API token"),
            Self::Legacy { key, .. } if key.trim().is_empty() => Some("API key"),
            Self::Legacy { email, .. } if email.trim().is_empty() => Some("account email"),
            _ => None,
        };
        match missing {
            Some(what) => Err(ClientError::Config {
                detail: format!("{what} must not be empty"),
            }),
            None => Ok(()),
        }
    }
}

// ============ Raw precedence ============

/// Whether a call resolves with the full envelope.
///
/// An explicit per-call value always wins, so a per-call `false` overrides a
/// client-wide `true`; an unset per-call value falls back to the client default.
pub fn resolve_raw(per_call: Option<bool>, client_default: bool) -> bool {
    per_call.unwrap_or(client_default)
}

// ============ Client configuration ============

/// Immutable client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub auth: AuthMode,
    /// Default `per_page` applied to calls that carry a query.
    pub items_per_page: u32,
    /// Total attempts per request; 1 means no retry.
    pub max_retries: u32,
    /// Client-wide default for returning the full envelope.
    pub raw: bool,
    /// Paginate every eligible listing unless the call opts out.
    pub auto_pagination: bool,
    pub auto_pagination_concurrency: usize,
    pub base_url: String,
    /// Backoff unit: after failed attempt `n` the executor waits `n × retry_delay`.
    pub retry_delay: Duration,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn builder(auth: AuthMode) -> ClientConfigBuilder {
        ClientConfigBuilder::new(auth)
    }

    /// Defaults with the given credentials.
    pub fn new(auth: AuthMode) -> Self {
        Self {
            auth,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            max_retries: DEFAULT_MAX_RETRIES,
            raw: false,
            auto_pagination: false,
            auto_pagination_concurrency: DEFAULT_AUTO_PAGINATION_CONCURRENCY,
            base_url: API_BASE_URL.to_string(),
            retry_delay: DEFAULT_RETRY_DELAY,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Credentials from `CLOUDFLARE_API_TOKEN`, or `CLOUDFLARE_API_KEY` with
    /// `CLOUDFLARE_EMAIL`; every other setting keeps its default.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let auth = if let Some(token) = lookup(ENV_API_TOKEN) {
            AuthMode::token(token)
        } else {
            match (lookup(ENV_API_KEY), lookup(ENV_EMAIL)) {
                (Some(key), Some(email)) => AuthMode::legacy(key, email),
                _ => {
                    return Err(ClientError::Config {
                        detail: format!(
                            "set {ENV_API_TOKEN}, or {ENV_API_KEY} and {ENV_EMAIL}"
                        ),
                    });
                }
            }
        };
        ClientConfigBuilder::new(auth).build()
    }

    /// Attempts actually made per request.
    pub fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }
}

/// Consuming builder for [`ClientConfig`].
#[derive(Debug, Clone)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn new(auth: AuthMode) -> Self {
        Self {
            config: ClientConfig::new(auth),
        }
    }

    #[must_use]
    pub fn items_per_page(mut self, items: u32) -> Self {
        self.config.items_per_page = items;
        self
    }

    #[must_use]
    pub fn max_retries(mut self, attempts: u32) -> Self {
        self.config.max_retries = attempts;
        self
    }

    #[must_use]
    pub fn raw(mut self, raw: bool) -> Self {
        self.config.raw = raw;
        self
    }

    #[must_use]
    pub fn auto_pagination(mut self, enabled: bool) -> Self {
        self.config.auto_pagination = enabled;
        self
    }

    #[must_use]
    pub fn auto_pagination_concurrency(mut self, concurrency: usize) -> Self {
        self.config.auto_pagination_concurrency = concurrency;
        self
    }

    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.config.retry_delay = delay;
        self
    }

    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn build(self) -> Result<ClientConfig> {
        let config = self.config;
        config.auth.check()?;

        if !(1..=MAX_ITEMS_PER_PAGE).contains(&config.items_per_page) {
            return Err(ClientError::Config {
                detail: format!(
                    "items_per_page must be between 1 and {MAX_ITEMS_PER_PAGE}, got {}",
                    config.items_per_page
                ),
            });
        }
        if config.auto_pagination_concurrency == 0 {
            return Err(ClientError::Config {
                detail: "auto_pagination_concurrency must be at least 1".to_string(),
            });
        }
        if config.base_url.is_empty() {
            return Err(ClientError::Config {
                detail: "base_url must not be empty".to_string(),
            });
        }
        Ok(config)
    }
}
