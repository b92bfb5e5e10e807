//! Client facade
//!
//! [`Client::request`] is the single entry point of the pipeline: every
//! endpoint, whether dispatched by name through [`Client::call`] or through one
//! of the typed wrappers below, ends up there with a schema fragment, a call
//! descriptor and an optional raw override.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::config::ClientConfig;
use crate::endpoints::{self, EndpointArgs};
use crate::error::{ClientError, Result};
use crate::executor::RequestExecutor;
use crate::gateway::ValidatorGateway;
use crate::http_client::{HttpExecutor, ReqwestExecutor};
use crate::paginator::Paginator;
use crate::schema::EndpointSchema;
use crate::types::{CallDescriptor, RequestBody};
use crate::validator::{SchemaValidator, Validator};

/// Cloudflare v4 API client.
///
/// Cheap to clone; clones share configuration and transport.
#[derive(Clone)]
pub struct Client {
    config: Arc<ClientConfig>,
    executor: RequestExecutor,
    gateway: ValidatorGateway,
}

impl Client {
    /// Client over the default reqwest transport.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = ReqwestExecutor::new(config.connect_timeout, config.request_timeout)?;
        Ok(Self::with_executor(config, Arc::new(http)))
    }

    /// Client over a caller-supplied transport.
    pub fn with_executor(config: ClientConfig, http: Arc<dyn HttpExecutor>) -> Self {
        let config = Arc::new(config);
        Self {
            executor: RequestExecutor::new(Arc::clone(&config), http),
            gateway: ValidatorGateway::new(Arc::new(SchemaValidator)),
            config,
        }
    }

    /// Replace the built-in schema validator.
    #[must_use]
    pub fn with_validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.gateway = ValidatorGateway::new(validator);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Run one call through validation, execution and, when requested,
    /// auto-pagination.
    pub async fn request(
        &self,
        fragment: &EndpointSchema,
        call: CallDescriptor,
        raw: Option<bool>,
    ) -> Result<Value> {
        let prepared = self.gateway.prepare(&self.config, fragment, call, raw)?;
        match prepared.pagination {
            Some(concurrency) => {
                Paginator::new(&self.executor)
                    .fetch_all(&prepared, concurrency)
                    .await
            }
            None => self.executor.execute(&prepared).await,
        }
    }

    /// [`Client::request`], deserializing the result into `T`.
    pub async fn request_as<T: DeserializeOwned>(
        &self,
        fragment: &EndpointSchema,
        call: CallDescriptor,
        raw: Option<bool>,
    ) -> Result<T> {
        let callee = call.callee.clone();
        let value = self.request(fragment, call, raw).await?;
        decode(&callee, value)
    }

    /// Call a catalog endpoint by name, e.g. `zone_dns_record_get_all`.
    pub async fn call(&self, name: &str, args: EndpointArgs, raw: Option<bool>) -> Result<Value> {
        let endpoint = endpoints::find(name).ok_or_else(|| ClientError::UnknownEndpoint {
            name: name.to_string(),
        })?;
        self.request(&endpoint.schema, endpoint.descriptor(args), raw)
            .await
    }

    /// [`Client::call`], deserializing the result into `T`.
    pub async fn call_as<T: DeserializeOwned>(
        &self,
        name: &str,
        args: EndpointArgs,
        raw: Option<bool>,
    ) -> Result<T> {
        let value = self.call(name, args, raw).await?;
        decode(name, value)
    }

    // ============ User ============

    pub async fn user_get(&self) -> Result<Value> {
        self.call("user_get", EndpointArgs::new(), None).await
    }

    // ============ Zones ============

    pub async fn zone_get_all(&self, query: Map<String, Value>) -> Result<Value> {
        self.call("zone_get_all", EndpointArgs::new().query(query), None)
            .await
    }

    pub async fn zone_get(&self, zone_id: &str) -> Result<Value> {
        self.call(
            "zone_get",
            EndpointArgs::new().param("identifier", zone_id),
            None,
        )
        .await
    }

    /// Purge every cached file of a zone.
    pub async fn zone_purge_cache(&self, zone_id: &str) -> Result<Value> {
        self.call(
            "zone_purge_cache",
            EndpointArgs::new().param("identifier", zone_id),
            None,
        )
        .await
    }

    /// Purge selected files or cache tags, e.g. `{"files": [...]}`.
    pub async fn zone_purge_cache_by(&self, zone_id: &str, body: Value) -> Result<Value> {
        self.call(
            "zone_purge_cache_by",
            EndpointArgs::new().param("identifier", zone_id).body(body),
            None,
        )
        .await
    }

    /// Upload a worker script. The body is sent verbatim, declared as
    /// `text/javascript` under key/email authentication.
    pub async fn zone_workers_script_update(
        &self,
        zone_id: &str,
        script: impl Into<String>,
    ) -> Result<Value> {
        self.call(
            "zone_workers_script_update",
            EndpointArgs::new()
                .param("identifier", zone_id)
                .body(RequestBody::Text(script.into())),
            None,
        )
        .await
    }

    // ============ DNS records ============

    pub async fn zone_dns_record_get_all(
        &self,
        zone_id: &str,
        query: Map<String, Value>,
    ) -> Result<Value> {
        self.call(
            "zone_dns_record_get_all",
            EndpointArgs::new()
                .param("zone_identifier", zone_id)
                .query(query),
            None,
        )
        .await
    }

    pub async fn zone_dns_record_new(&self, zone_id: &str, record: Value) -> Result<Value> {
        self.call(
            "zone_dns_record_new",
            EndpointArgs::new()
                .param("zone_identifier", zone_id)
                .body(record),
            None,
        )
        .await
    }

    pub async fn zone_dns_record_update(
        &self,
        zone_id: &str,
        record_id: &str,
        changes: Value,
    ) -> Result<Value> {
        self.call(
            "zone_dns_record_update",
            EndpointArgs::new()
                .param("zone_identifier", zone_id)
                .param("identifier", record_id)
                .body(changes),
            None,
        )
        .await
    }

    pub async fn zone_dns_record_destroy(&self, zone_id: &str, record_id: &str) -> Result<Value> {
        self.call(
            "zone_dns_record_destroy",
            EndpointArgs::new()
                .param("zone_identifier", zone_id)
                .param("identifier", record_id),
            None,
        )
        .await
    }

    // ============ Page rules ============

    pub async fn zone_page_rules_get_all(
        &self,
        zone_id: &str,
        query: Map<String, Value>,
    ) -> Result<Value> {
        self.call(
            "zone_page_rules_get_all",
            EndpointArgs::new()
                .param("zone_identifier", zone_id)
                .query(query),
            None,
        )
        .await
    }

    pub async fn zone_page_rules_new(&self, zone_id: &str, rule: Value) -> Result<Value> {
        self.call(
            "zone_page_rules_new",
            EndpointArgs::new()
                .param("zone_identifier", zone_id)
                .body(rule),
            None,
        )
        .await
    }

    pub async fn zone_page_rules_destroy(&self, zone_id: &str, rule_id: &str) -> Result<Value> {
        self.call(
            "zone_page_rules_destroy",
            EndpointArgs::new()
                .param("zone_identifier", zone_id)
                .param("identifier", rule_id),
            None,
        )
        .await
    }
}

fn decode<T: DeserializeOwned>(callee: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| ClientError::Parse {
        callee: callee.to_string(),
        detail: format!("Failed to deserialize result: {e}"),
    })
}
