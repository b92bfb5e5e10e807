//! # cloudflare-client
//!
//! An async client for the [Cloudflare v4 API](https://api.cloudflare.com/client/v4).
//!
//! Every call runs through one pipeline:
//!
//! 1. the endpoint's schema fragment is merged with the framework fields
//!    (`callee`, `method`, `path`, paging bounds, raw and pagination flags)
//!    into a JSON Schema document,
//! 2. the call is validated in full with `jsonschema`, collecting every violation,
//! 3. the request is sent with linear retry backoff,
//! 4. the response envelope is unwrapped, or every page of a listing is
//!    fetched and concatenated in page order.
//!
//! Endpoints are data: see [`endpoints::catalog`] for the full table.
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)* — Use the platform's native TLS implementation.
//! - **`rustls`** — Use rustls. Recommended for cross-compilation and Android targets.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cloudflare_client::{AuthMode, Client, ClientConfig, EndpointArgs};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1. Configure the client
//!     let config = ClientConfig::builder(AuthMode::token("your-token"))
//!         .max_retries(3)
//!         .auto_pagination_concurrency(4)
//!         .build()?;
//!     let client = Client::new(config)?;
//!
//!     // 2. Fetch every zone, all pages at once
//!     let zones = client
//!         .call(
//!             "zone_get_all",
//!             EndpointArgs::new().query_param("auto_pagination", true),
//!             None,
//!         )
//!         .await?;
//!     println!("{zones:#}");
//!
//!     // 3. Create a DNS record
//!     let record = client
//!         .zone_dns_record_new(
//!             "023e105f4ecef8ad9ca31a8372d0c353",
//!             json!({"type": "A", "name": "www.example.com", "content": "192.0.2.1"}),
//!         )
//!         .await?;
//!     println!("{record:#}");
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ClientError>`](ClientError):
//!
//! - [`ClientError::Validation`] — the call does not match the endpoint schema; never sent
//! - [`ClientError::Request`] — no HTTP response (retryable)
//! - [`ClientError::Api`] — non-2xx status with the API's first error (retryable)
//! - [`ClientError::MissingResultField`] — 2xx without the expected field (retryable)
//! - [`ClientError::PaginationUnsupported`] — auto-pagination on a plain endpoint; never sent
//!
//! Retryable errors are retried up to `max_retries` attempts, waiting
//! `attempt × retry_delay` between them.

mod client;
mod config;
pub mod endpoints;
mod error;
mod executor;
mod gateway;
mod http_client;
mod paginator;
mod path;
mod schema;
mod types;
mod utils;
pub mod validator;

pub use client::Client;
pub use config::{API_BASE_URL, AuthMode, ClientConfig, ClientConfigBuilder, resolve_raw};
pub use endpoints::{Endpoint, EndpointArgs};
pub use error::{ClientError, Result};
pub use executor::{RequestExecutor, backoff_delay, build_url, encode_query};
pub use gateway::{PreparedCall, ValidatorGateway};
pub use http_client::{HttpExecutor, HttpRequest, HttpResponse, ReqwestExecutor, TransportError};
pub use paginator::Paginator;
pub use path::{placeholders, resolve_path};
pub use schema::{EndpointSchema, compose};
pub use types::{ApiMessage, CallDescriptor, Method, RequestBody, ResponseEnvelope, ResultInfo};
pub use validator::{FieldRule, ObjectSchema, SchemaValidator, Validator, Violation};
