//! End-to-end pipeline behavior over the scripted mock transport.

mod common;

use std::time::Duration;

use cloudflare_client::{
    AuthMode, CallDescriptor, ClientConfig, ClientError, EndpointArgs, EndpointSchema,
    FieldRule, Method, ObjectSchema,
};
use common::{BASE_URL, MockExecutor, RECORD_ID, Reply, ZONE_ID, client, query_param, token_config};
use serde_json::{Map, Value, json};

fn listing_query(concurrency: u32) -> Map<String, Value> {
    let mut query = Map::new();
    query.insert("auto_pagination".to_string(), json!(true));
    query.insert("auto_pagination_concurrency".to_string(), json!(concurrency));
    query
}

fn violation_paths(err: &ClientError) -> Vec<String> {
    match err {
        ClientError::Validation { violations, .. } => {
            violations.iter().map(|v| v.path.clone()).collect()
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

// ============ Validation ============

#[tokio::test]
async fn test_missing_descriptor_fields_fail_before_any_request() {
    let mock = MockExecutor::new();
    mock.on_any([Reply::ok(&json!({}))]);
    let client = client(token_config(), &mock);

    let err = client
        .request(&EndpointSchema::new(), CallDescriptor::default(), None)
        .await
        .unwrap_err();
    let paths = violation_paths(&err);
    for field in ["callee", "method", "path"] {
        assert!(paths.iter().any(|p| p == field), "{field} not reported: {paths:?}");
    }

    let no_path = CallDescriptor::new("user_get", Method::Get, "");
    let err = client
        .request(&EndpointSchema::new(), no_path, None)
        .await
        .unwrap_err();
    assert_eq!(violation_paths(&err), vec!["path"]);

    let mut no_method = CallDescriptor::new("user_get", Method::Get, "user");
    no_method.method = None;
    let err = client
        .request(&EndpointSchema::new(), no_method, None)
        .await
        .unwrap_err();
    assert_eq!(violation_paths(&err), vec!["method"]);

    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_every_violation_is_reported_and_never_retried() {
    let mock = MockExecutor::new();
    mock.on_any([Reply::ok(&json!({}))]);
    let mut config = token_config();
    config.max_retries = 5;
    let client = client(config, &mock);

    let err = client
        .zone_dns_record_new("too-short", json!({"type": "PTR", "content": "192.0.2.1"}))
        .await
        .unwrap_err();

    let paths = violation_paths(&err);
    assert!(paths.contains(&"params.zone_identifier".to_string()), "{paths:?}");
    assert!(paths.contains(&"body.type".to_string()), "{paths:?}");
    assert!(paths.contains(&"body.name".to_string()), "{paths:?}");
    assert!(!err.is_retryable());
    assert!(err.to_string().starts_with("[zone_dns_record_new] Validation error: POST /zones/too-short/dns_records"));
    assert_eq!(mock.request_count(), 0);
}

// ============ Paths and unwrapping ============

#[tokio::test]
async fn test_path_parameters_are_substituted_verbatim() {
    let mock = MockExecutor::new();
    mock.on_any([Reply::ok(&json!({"id": RECORD_ID}))]);
    let client = client(token_config(), &mock);

    let record = client
        .call(
            "zone_dns_record_get",
            EndpointArgs::new()
                .param("zone_identifier", ZONE_ID)
                .param("identifier", RECORD_ID),
            None,
        )
        .await
        .unwrap();

    assert_eq!(record, json!({"id": RECORD_ID}));
    assert_eq!(
        mock.urls(),
        vec![format!("{BASE_URL}/zones/{ZONE_ID}/dns_records/{RECORD_ID}")]
    );
}

#[tokio::test]
async fn test_unmatched_placeholders_stay_literal() {
    let mock = MockExecutor::new();
    mock.on_any([Reply::ok(&json!(true))]);
    let client = client(token_config(), &mock);

    let fragment = EndpointSchema::new().params(
        ObjectSchema::new().field("zone_identifier", FieldRule::string().required()),
    );
    let call = CallDescriptor::new("custom", Method::Get, "zones/:zone_identifier/hooks/:hook")
        .param("zone_identifier", ZONE_ID)
        .required("result");
    client.request(&fragment, call, None).await.unwrap();

    assert_eq!(mock.urls(), vec![format!("{BASE_URL}/zones/{ZONE_ID}/hooks/:hook")]);
}

#[tokio::test]
async fn test_required_field_is_unwrapped() {
    let mock = MockExecutor::new();
    mock.on_any([Reply::ok(&json!({"id": "7c5dae5552338874e5053f2534d2767a", "email": "user@example.com"}))]);
    let client = client(token_config(), &mock);

    let user = client.user_get().await.unwrap();
    assert_eq!(user["email"], "user@example.com");
    assert!(user.get("success").is_none());
}

#[tokio::test]
async fn test_missing_required_field_is_an_api_error() {
    let mock = MockExecutor::new();
    mock.on_any([Reply::json(200, &json!({"success": true, "errors": [], "result": null}))]);
    let client = client(token_config(), &mock);

    let err = client.zone_get(ZONE_ID).await.unwrap_err();
    match &err {
        ClientError::MissingResultField {
            callee,
            method,
            path,
            field,
        } => {
            assert_eq!(callee, "zone_get");
            assert_eq!(method, "GET");
            assert_eq!(path, &format!("zones/{ZONE_ID}"));
            assert_eq!(field, "result");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(err.is_api_error());
    assert_eq!(mock.request_count(), 1);
}

#[tokio::test]
async fn test_per_call_raw_false_beats_client_raw() {
    let envelope = json!({"success": true, "errors": [], "result": {"id": 1}});
    let mock = MockExecutor::new();
    mock.on_any([Reply::json(200, &envelope)]);
    let mut config = token_config();
    config.raw = true;
    let client = client(config, &mock);

    assert_eq!(client.user_get().await.unwrap(), envelope);
    assert_eq!(
        client
            .call("user_get", EndpointArgs::new(), Some(false))
            .await
            .unwrap(),
        json!({"id": 1})
    );
}

// ============ Retry ============

#[tokio::test(start_paused = true)]
async fn test_rate_limited_twice_then_success_uses_linear_backoff() {
    let mock = MockExecutor::new();
    mock.on_any([
        Reply::error(429, 10000, "Rate limited"),
        Reply::error(429, 10000, "Rate limited"),
        Reply::ok(&json!({"id": "ok"})),
    ]);
    let mut config = token_config();
    config.max_retries = 3;
    let client = client(config, &mock);

    let user = client.user_get().await.unwrap();
    assert_eq!(user, json!({"id": "ok"}));

    let requests = mock.requests();
    assert_eq!(requests.len(), 3);
    assert!(requests[1].at - requests[0].at >= Duration::from_millis(1000));
    assert!(requests[2].at - requests[1].at >= Duration::from_millis(2000));
}

#[tokio::test(start_paused = true)]
async fn test_last_error_is_returned_after_retries() {
    let mock = MockExecutor::new();
    mock.on_any([
        Reply::transport("connection reset"),
        Reply::error(403, 9109, "Unauthorized to access requested resource"),
    ]);
    let mut config = token_config();
    config.max_retries = 2;
    let client = client(config, &mock);

    let err = client.user_get().await.unwrap_err();
    match err {
        ClientError::Api {
            status,
            error_code,
            message,
            ..
        } => {
            assert_eq!(status, 403);
            assert_eq!(error_code, Some(9109));
            assert_eq!(message, "Unauthorized to access requested resource");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(mock.request_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_default_config_makes_a_single_attempt() {
    let mock = MockExecutor::new();
    mock.on_any([Reply::transport("dns failure"), Reply::ok(&json!({}))]);
    let client = client(token_config(), &mock);

    let err = client.user_get().await.unwrap_err();
    assert!(matches!(err, ClientError::Request { ref detail, .. } if detail == "dns failure"));
    assert_eq!(mock.request_count(), 1);
}

// ============ Pagination ============

fn three_page_listing(mock: &MockExecutor) {
    mock.on_page(1, Reply::page(1, 3, &json!([{"id": 1}, {"id": 2}])));
    mock.on_page(
        2,
        Reply::page(2, 3, &json!([{"id": 3}, {"id": 4}])).delayed(Duration::from_millis(300)),
    );
    mock.on_page(
        3,
        Reply::page(3, 3, &json!([{"id": 5}])).delayed(Duration::from_millis(100)),
    );
}

#[tokio::test(start_paused = true)]
async fn test_pages_are_concatenated_in_page_order() {
    let expected = json!([{"id": 1}, {"id": 2}, {"id": 3}, {"id": 4}, {"id": 5}]);

    for concurrency in [1, 2, 3] {
        let mock = MockExecutor::new();
        three_page_listing(&mock);
        let client = client(token_config(), &mock);

        let zones = client.zone_get_all(listing_query(concurrency)).await.unwrap();
        assert_eq!(zones, expected, "concurrency {concurrency}");

        let urls = mock.urls();
        assert_eq!(urls.len(), 3);
        assert_eq!(query_param(&urls[0], "page").as_deref(), Some("1"));
        for url in &urls {
            assert!(!url.contains("auto_pagination"), "{url}");
            assert_eq!(query_param(url, "per_page").as_deref(), Some("100"));
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_page_requests_respect_concurrency_bound() {
    for concurrency in [1_usize, 2, 4] {
        let mock = MockExecutor::new();
        mock.on_page(1, Reply::page(1, 6, &json!([1])));
        for page in 2..=6 {
            mock.on_page(
                page,
                Reply::page(page, 6, &json!([page])).delayed(Duration::from_millis(50)),
            );
        }
        let mut config = token_config();
        config.auto_pagination = true;
        config.auto_pagination_concurrency = concurrency;
        let client = client(config, &mock);

        let zones = client.zone_get_all(Map::new()).await.unwrap();
        assert_eq!(zones, json!([1, 2, 3, 4, 5, 6]));
        assert_eq!(mock.max_in_flight(), concurrency);
    }
}

#[tokio::test(start_paused = true)]
async fn test_single_page_listing_short_circuits() {
    let mock = MockExecutor::new();
    mock.on_any([Reply::ok(&json!([{"id": "only"}]))]);
    let client = client(token_config(), &mock);

    let zones = client.zone_get_all(listing_query(2)).await.unwrap();
    assert_eq!(zones, json!([{"id": "only"}]));
    assert_eq!(mock.request_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_page_count_is_read_despite_unusual_envelope_fields() {
    let mock = MockExecutor::new();
    mock.on_page(
        1,
        Reply::json(
            200,
            &json!({
                "success": true,
                "errors": [],
                "messages": ["Listing is deprecated"],
                "result": [{"id": 1}],
                "result_info": {"page": 1, "per_page": 1, "total_pages": 2},
            }),
        ),
    );
    mock.on_page(2, Reply::page(2, 2, &json!([{"id": 2}])));
    let client = client(token_config(), &mock);

    let zones = client.zone_get_all(listing_query(1)).await.unwrap();
    assert_eq!(zones, json!([{"id": 1}, {"id": 2}]));
    assert_eq!(mock.request_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_failing_page_fails_the_whole_listing() {
    let mock = MockExecutor::new();
    mock.on_page(1, Reply::page(1, 3, &json!([1])));
    mock.on_page(2, Reply::page(2, 3, &json!([2])));
    mock.on_page(3, Reply::error(500, 1000, "Internal error"));
    let client = client(token_config(), &mock);

    let err = client.zone_get_all(listing_query(2)).await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 500, .. }));
}

#[tokio::test]
async fn test_pagination_on_plain_endpoint_is_rejected_without_requests() {
    let mock = MockExecutor::new();
    mock.on_any([Reply::ok(&json!({}))]);
    let client = client(token_config(), &mock);

    let err = client
        .call(
            "zone_get",
            EndpointArgs::new()
                .param("identifier", ZONE_ID)
                .query_param("auto_pagination", true),
            None,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::PaginationUnsupported { ref callee } if callee == "zone_get"));
    assert_eq!(err.to_string(), "[zone_get] does not support pagination");
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_explicit_false_disables_client_pagination() {
    let mock = MockExecutor::new();
    mock.on_any([Reply::page(1, 4, &json!([1, 2]))]);
    let mut config = token_config();
    config.auto_pagination = true;
    let client = client(config, &mock);

    let mut query = Map::new();
    query.insert("auto_pagination".to_string(), json!(false));
    let zones = client.zone_get_all(query).await.unwrap();

    assert_eq!(zones, json!([1, 2]));
    assert_eq!(mock.request_count(), 1);
    assert!(!mock.urls()[0].contains("auto_pagination"));
}

#[tokio::test]
async fn test_query_defaults_follow_configuration() {
    let mock = MockExecutor::new();
    mock.on_any([Reply::ok(&json!([]))]);
    let mut config = token_config();
    config.items_per_page = 20;
    let client = client(config, &mock);

    client
        .zone_dns_record_get_all(ZONE_ID, Map::new())
        .await
        .unwrap();
    let mut query = Map::new();
    query.insert("page".to_string(), json!(3));
    client.zone_dns_record_get_all(ZONE_ID, query).await.unwrap();

    let urls = mock.urls();
    assert_eq!(query_param(&urls[0], "page").as_deref(), Some("1"));
    assert_eq!(query_param(&urls[0], "per_page").as_deref(), Some("20"));
    assert_eq!(query_param(&urls[1], "page").as_deref(), Some("3"));
}

// ============ Headers and bodies ============

#[tokio::test]
async fn test_token_auth_sends_bearer_header_and_json_body() {
    let mock = MockExecutor::new();
    mock.on_any([Reply::ok(&json!({"id": RECORD_ID}))]);
    let client = client(token_config(), &mock);

    let record = json!({"type": "A", "name": "www.example.com", "content": "192.0.2.1", "ttl": 120});
    client.zone_dns_record_new(ZONE_ID, record.clone()).await.unwrap();

    let request = &mock.requests()[0].request;
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.header("authorization"), Some("Bearer test-token"));
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert!(request.header("x-auth-key").is_none());
    let sent: Value = serde_json::from_str(request.body.as_deref().unwrap_or_default()).unwrap();
    assert_eq!(sent, record);
}

#[tokio::test]
async fn test_legacy_auth_sends_script_verbatim() {
    let mock = MockExecutor::new();
    mock.on_any([Reply::ok(&json!({"script": "ok"}))]);
    let config = ClientConfig::new(AuthMode::legacy("c2547eb745079dac9320b638f5e225cf483cc5cfdda41", "user@example.com"));
    let client = client(config, &mock);

    let script = "addEventListener('fetch', event => { event.respondWith(fetch(event.request)) })";
    client.zone_workers_script_update(ZONE_ID, script).await.unwrap();

    let request = &mock.requests()[0].request;
    assert_eq!(request.method, Method::Put);
    assert_eq!(request.url, format!("{BASE_URL}/zones/{ZONE_ID}/workers/script"));
    assert_eq!(
        request.header("x-auth-key"),
        Some("c2547eb745079dac9320b638f5e225cf483cc5cfdda41")
    );
    assert_eq!(request.header("x-auth-email"), Some("user@example.com"));
    assert_eq!(request.header("content-type"), Some("text/javascript"));
    assert!(request.header("authorization").is_none());
    assert_eq!(request.body.as_deref(), Some(script));
}

#[tokio::test]
async fn test_token_auth_declares_json_for_script_upload() {
    let mock = MockExecutor::new();
    mock.on_any([Reply::ok(&json!({"script": "ok"}))]);
    let client = client(token_config(), &mock);

    let script = "addEventListener('fetch', event => {})";
    client.zone_workers_script_update(ZONE_ID, script).await.unwrap();

    let request = &mock.requests()[0].request;
    assert_eq!(request.header("authorization"), Some("Bearer test-token"));
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert_eq!(request.body.as_deref(), Some(script));
}

#[tokio::test]
async fn test_purge_cache_defaults_to_purge_everything() {
    let mock = MockExecutor::new();
    mock.on_any([Reply::ok(&json!({"id": ZONE_ID}))]);
    let client = client(token_config(), &mock);

    client.zone_purge_cache(ZONE_ID).await.unwrap();
    client
        .zone_purge_cache_by(ZONE_ID, json!({"files": ["https://example.com/app.js"]}))
        .await
        .unwrap();

    let requests = mock.requests();
    assert_eq!(requests[0].request.method, Method::Delete);
    assert_eq!(requests[0].request.body.as_deref(), Some(r#"{"purge_everything":true}"#));
    assert_eq!(
        requests[1].request.body.as_deref(),
        Some(r#"{"files":["https://example.com/app.js"]}"#)
    );
}
