//! Shared test helpers: a scripted in-memory transport and assertion macros.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use cloudflare_client::{
    AuthMode, Client, ClientConfig, HttpExecutor, HttpRequest, HttpResponse, TransportError,
};
use serde_json::{Value, json};
use tokio::time::Instant;

pub const ZONE_ID: &str = "023e105f4ecef8ad9ca31a8372d0c353";
pub const RECORD_ID: &str = "372e67954025e0ba6aaa6d586b9e0b59";
pub const BASE_URL: &str = "https://api.cloudflare.com/client/v4";

/// Skip the test when an environment variable is missing.
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("skipping test: missing environment variable {}", $var);
                return;
            }
        )+
    };
}

/// Assert that an `Option` is `Some` and unwrap it.
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {{
        let opt = $expr;
        assert!(opt.is_some(), "expected Some(..), got None");
        let Some(val) = opt else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// Assert that a `Result` is `Ok` and unwrap it.
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// One scripted answer.
#[derive(Debug, Clone)]
pub struct Reply {
    outcome: Result<HttpResponse, TransportError>,
    delay: Duration,
}

impl Reply {
    pub fn json(status: u16, body: &Value) -> Self {
        Self::text(status, "application/json", &body.to_string())
    }

    pub fn text(status: u16, content_type: &str, body: &str) -> Self {
        Self {
            outcome: Ok(HttpResponse {
                status,
                content_type: Some(content_type.to_string()),
                body: body.to_string(),
            }),
            delay: Duration::ZERO,
        }
    }

    pub fn transport(detail: &str) -> Self {
        Self {
            outcome: Err(TransportError::new(detail)),
            delay: Duration::ZERO,
        }
    }

    /// `{"success": true, "result": result}`
    pub fn ok(result: &Value) -> Self {
        Self::json(200, &json!({"success": true, "errors": [], "result": result}))
    }

    /// Successful listing page with `result_info`.
    pub fn page(page: u32, total_pages: u32, result: &Value) -> Self {
        Self::json(
            200,
            &json!({
                "success": true,
                "errors": [],
                "messages": [],
                "result": result,
                "result_info": {
                    "page": page,
                    "per_page": 100,
                    "total_pages": total_pages,
                },
            }),
        )
    }

    /// Cloudflare-style error envelope.
    pub fn error(status: u16, code: i64, message: &str) -> Self {
        Self::json(
            status,
            &json!({
                "success": false,
                "errors": [{"code": code, "message": message}],
                "result": null,
            }),
        )
    }

    #[must_use]
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Route {
    Any,
    Contains(String),
    Page(u32),
}

impl Route {
    fn matches(&self, url: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Contains(fragment) => url.contains(fragment.as_str()),
            Self::Page(page) => query_param(url, "page") == Some(page.to_string()),
        }
    }
}

/// Queue of replies for one route; the last reply repeats once the queue is drained.
struct Script {
    route: Route,
    replies: VecDeque<Reply>,
}

/// A request seen by the mock, with the (tokio) time it arrived.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub request: HttpRequest,
    pub at: Instant,
}

/// In-memory [`HttpExecutor`] answering from scripted replies.
#[derive(Default)]
pub struct MockExecutor {
    scripts: Mutex<Vec<Script>>,
    recorded: Mutex<Vec<Recorded>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockExecutor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Answer every request with `replies`, in order.
    pub fn on_any(&self, replies: impl IntoIterator<Item = Reply>) {
        self.script(Route::Any, replies);
    }

    /// Answer requests whose URL contains `fragment`.
    pub fn on_url(&self, fragment: &str, replies: impl IntoIterator<Item = Reply>) {
        self.script(Route::Contains(fragment.to_string()), replies);
    }

    /// Answer requests for one page of a listing.
    pub fn on_page(&self, page: u32, reply: Reply) {
        self.script(Route::Page(page), [reply]);
    }

    fn script(&self, route: Route, replies: impl IntoIterator<Item = Reply>) {
        self.scripts.lock().unwrap().push(Script {
            route,
            replies: replies.into_iter().collect(),
        });
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.recorded.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.recorded.lock().unwrap().len()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.request.url).collect()
    }

    /// Highest number of requests that were in flight at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn next_reply(&self, url: &str) -> Option<Reply> {
        let mut scripts = self.scripts.lock().unwrap();
        let script = scripts.iter_mut().find(|s| s.route.matches(url))?;
        if script.replies.len() > 1 {
            script.replies.pop_front()
        } else {
            script.replies.front().cloned()
        }
    }
}

#[async_trait]
impl HttpExecutor for MockExecutor {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url.clone();
        self.recorded.lock().unwrap().push(Recorded {
            request,
            at: Instant::now(),
        });

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let reply = self
            .next_reply(&url)
            .unwrap_or_else(|| Reply::transport(&format!("no scripted reply for {url}")));
        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        reply.outcome
    }
}

/// Value of a query-string parameter of `url`.
pub fn query_param(url: &str, name: &str) -> Option<String> {
    let (_, query) = url.split_once('?')?;
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

/// Token-authenticated configuration with every other setting at its default.
pub fn token_config() -> ClientConfig {
    ClientConfig::new(AuthMode::token("test-token"))
}

pub fn client(config: ClientConfig, mock: &Arc<MockExecutor>) -> Client {
    Client::with_executor(config, mock.clone())
}

/// Unique name for a throwaway DNS record.
pub fn generate_test_record_name() -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("_test-{}", &uuid.to_string()[..8])
}

/// Live client and zone name from `CLOUDFLARE_API_TOKEN` and `TEST_DOMAIN`.
pub fn live_context() -> Option<(Client, String)> {
    let config = ClientConfig::from_env().ok()?;
    let domain = std::env::var("TEST_DOMAIN").ok()?;
    let client = Client::new(config).ok()?;
    Some((client, domain))
}
