//! Declarative endpoint catalog
//!
//! Every API operation is a row of data: name, method, path template, the
//! response field it unwraps and its [`EndpointSchema`] fragment. The client
//! dispatches through [`find`]; no endpoint has bespoke request code.

mod certificates;
mod dns;
mod firewall;
mod organizations;
mod page_rules;
mod railgun;
mod settings;
mod user;
mod zones;

use std::sync::LazyLock;

use serde_json::{Map, Value};

use crate::schema::{AUTO_PAGINATION, EndpointSchema};
use crate::types::{CallDescriptor, Method, RequestBody};
use crate::validator::{FieldRule, ObjectSchema};

/// One API operation.
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub name: &'static str,
    pub method: Method,
    pub path: &'static str,
    /// Response field unwrapped on success; `result` for almost every endpoint.
    pub required: Option<&'static str>,
    pub content_type: Option<&'static str>,
    pub schema: EndpointSchema,
    /// Body sent when the caller supplies none.
    pub default_body: Option<Value>,
}

impl Endpoint {
    fn new(name: &'static str, method: Method, path: &'static str) -> Self {
        Self {
            name,
            method,
            path,
            required: Some("result"),
            content_type: None,
            schema: EndpointSchema::new(),
            default_body: None,
        }
    }

    pub(crate) fn get(name: &'static str, path: &'static str) -> Self {
        Self::new(name, Method::Get, path)
    }

    pub(crate) fn post(name: &'static str, path: &'static str) -> Self {
        Self::new(name, Method::Post, path)
    }

    pub(crate) fn put(name: &'static str, path: &'static str) -> Self {
        Self::new(name, Method::Put, path)
    }

    pub(crate) fn patch(name: &'static str, path: &'static str) -> Self {
        Self::new(name, Method::Patch, path)
    }

    pub(crate) fn delete(name: &'static str, path: &'static str) -> Self {
        Self::new(name, Method::Delete, path)
    }

    #[must_use]
    pub(crate) fn params(mut self, params: ObjectSchema) -> Self {
        self.schema = self.schema.params(params);
        self
    }

    #[must_use]
    pub(crate) fn query(mut self, query: ObjectSchema) -> Self {
        self.schema = self.schema.query(query);
        self
    }

    #[must_use]
    pub(crate) fn body(mut self, body: FieldRule) -> Self {
        self.schema = self.schema.body(body);
        self
    }

    #[must_use]
    pub(crate) fn content_type(mut self, content_type: &'static str) -> Self {
        self.content_type = Some(content_type);
        self
    }

    #[must_use]
    pub(crate) fn default_body(mut self, body: Value) -> Self {
        self.default_body = Some(body);
        self
    }

    /// Resolve with the whole response instead of `result`.
    #[must_use]
    pub(crate) fn unwrapped(mut self) -> Self {
        self.required = None;
        self
    }

    /// Whether listings of this endpoint can be auto-paginated.
    pub fn supports_pagination(&self) -> bool {
        self.schema.supports_pagination()
    }

    /// Call descriptor for this endpoint with the caller's arguments.
    ///
    /// Endpoints that declare a query always send one, so paging defaults
    /// apply even when the caller passes no filters.
    pub fn descriptor(&self, args: EndpointArgs) -> CallDescriptor {
        let query = match args.query {
            Some(query) => Some(query),
            None if self.schema.query.is_some() => Some(Map::new()),
            None => None,
        };
        let body = args
            .body
            .or_else(|| self.default_body.clone().map(RequestBody::from));

        CallDescriptor {
            callee: self.name.to_string(),
            method: Some(self.method),
            path: self.path.to_string(),
            params: args.params,
            query,
            body,
            required: self.required.map(ToString::to_string),
            raw: None,
            content_type: self.content_type.map(ToString::to_string),
        }
    }
}

/// Caller-supplied arguments of a catalog call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EndpointArgs {
    pub params: Map<String, Value>,
    pub query: Option<Map<String, Value>>,
    pub body: Option<RequestBody>,
}

impl EndpointArgs {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn query(mut self, query: Map<String, Value>) -> Self {
        self.query = Some(query);
        self
    }

    /// Set a single query key, creating the query if needed.
    #[must_use]
    pub fn query_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query
            .get_or_insert_with(Map::new)
            .insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = Some(body.into());
        self
    }
}

static CATALOG: LazyLock<Vec<Endpoint>> = LazyLock::new(|| {
    [
        user::endpoints(),
        zones::endpoints(),
        settings::endpoints(),
        dns::endpoints(),
        firewall::endpoints(),
        organizations::endpoints(),
        railgun::endpoints(),
        certificates::endpoints(),
        page_rules::endpoints(),
    ]
    .into_iter()
    .flatten()
    .collect()
});

/// Every endpoint known to the client.
pub fn catalog() -> &'static [Endpoint] {
    &CATALOG
}

/// Endpoint by name, e.g. `zone_dns_record_get_all`.
pub fn find(name: &str) -> Option<&'static Endpoint> {
    CATALOG.iter().find(|endpoint| endpoint.name == name)
}

// ============ Shared schema pieces ============

/// 32-character hex identifier.
pub(crate) fn id() -> FieldRule {
    FieldRule::string().exact_len(32).required()
}

pub(crate) fn zone_params() -> ObjectSchema {
    ObjectSchema::new().field("zone_identifier", id())
}

pub(crate) fn zone_item_params() -> ObjectSchema {
    zone_params().field("identifier", id())
}

pub(crate) fn item_params() -> ObjectSchema {
    ObjectSchema::new().field("identifier", id())
}

pub(crate) fn organization_params() -> ObjectSchema {
    ObjectSchema::new().field("organization_identifier", id())
}

pub(crate) fn organization_item_params() -> ObjectSchema {
    organization_params().field("identifier", id())
}

/// Query of a paginated listing.
pub(crate) fn listing() -> ObjectSchema {
    ObjectSchema::new().field(AUTO_PAGINATION, FieldRule::boolean())
}

/// Paginated listing with `direction` and `match` filters.
pub(crate) fn sorted_listing() -> ObjectSchema {
    listing()
        .field("direction", FieldRule::string().valid(["asc", "desc"]))
        .field("match", FieldRule::string().valid(["any", "all"]))
}

pub(crate) fn on_off() -> FieldRule {
    FieldRule::string().valid(["on", "off"])
}

/// Required body object.
pub(crate) fn object_body(schema: ObjectSchema) -> FieldRule {
    FieldRule::object(schema).required()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::placeholders;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique() {
        let mut seen = HashSet::new();
        for endpoint in catalog() {
            assert!(seen.insert(endpoint.name), "duplicate endpoint {}", endpoint.name);
        }
        assert!(catalog().len() > 150);
    }

    #[test]
    fn every_placeholder_has_a_param_rule() {
        for endpoint in catalog() {
            for name in placeholders(endpoint.path) {
                let declared = endpoint
                    .schema
                    .params
                    .as_ref()
                    .is_some_and(|params| params.contains(name));
                assert!(declared, "{}: no rule for :{name}", endpoint.name);
            }
        }
    }

    #[test]
    fn listings_support_pagination() {
        for name in [
            "zone_get_all",
            "zone_dns_record_get_all",
            "user_billing_history_get_all",
            "zone_page_rules_get_all",
            "organization_member_get_all",
        ] {
            let endpoint = find(name).unwrap();
            assert!(endpoint.supports_pagination(), "{name}");
        }
        assert!(!find("zone_analytics_dashboard_get").unwrap().supports_pagination());
        assert!(!find("zone_get").unwrap().supports_pagination());
    }

    #[test]
    fn descriptor_defaults_query_for_listings() {
        let endpoint = find("zone_get_all").unwrap();
        let call = endpoint.descriptor(EndpointArgs::new());
        assert_eq!(call.query, Some(Map::new()));
        assert_eq!(call.method, Some(Method::Get));
        assert_eq!(call.required.as_deref(), Some("result"));

        let plain = find("user_get").unwrap().descriptor(EndpointArgs::new());
        assert_eq!(plain.query, None);
    }

    #[test]
    fn purge_cache_sends_default_body() {
        let call = find("zone_purge_cache")
            .unwrap()
            .descriptor(EndpointArgs::new().param("identifier", "x"));
        assert_eq!(
            call.body,
            Some(RequestBody::Json(serde_json::json!({"purge_everything": true})))
        );
    }

    #[test]
    fn workers_script_upload_is_text() {
        let endpoint = find("zone_workers_script_update").unwrap();
        assert_eq!(endpoint.method, Method::Put);
        assert_eq!(endpoint.content_type, Some("text/javascript"));
        assert!(find("zone_workers_script_get").unwrap().required.is_none());
    }

    #[test]
    fn unknown_name() {
        assert!(find("zone_teleport").is_none());
    }
}
