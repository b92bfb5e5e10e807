//! Auto-pagination
//!
//! Page 1 is fetched with the full envelope to read `result_info.total_pages`; the
//! remaining pages run with at most `concurrency` requests in flight and are
//! concatenated in page order, whatever order they complete in.

use futures::{StreamExt, TryStreamExt, stream};
use serde_json::Value;

use crate::error::Result;
use crate::executor::RequestExecutor;
use crate::gateway::PreparedCall;
use crate::types::total_pages_of;

/// Aggregates every page of a listing.
pub struct Paginator<'a> {
    executor: &'a RequestExecutor,
}

impl<'a> Paginator<'a> {
    pub fn new(executor: &'a RequestExecutor) -> Self {
        Self { executor }
    }

    /// Fetch all pages of `call` with up to `concurrency` requests in flight.
    ///
    /// The first failing page aborts the whole listing; no partial result is
    /// returned.
    pub async fn fetch_all(&self, call: &PreparedCall, concurrency: usize) -> Result<Value> {
        let first = self.executor.execute(&call.for_page(1, true)).await?;

        let total_pages = total_pages_of(&first);

        let mut first = first;
        let first_result = first
            .get_mut("result")
            .map(Value::take)
            .unwrap_or(Value::Null);

        let Some(total_pages) = total_pages else {
            return Ok(first_result);
        };

        log::debug!(
            "[{}] auto-paginating {total_pages} pages, concurrency {concurrency}",
            call.callee
        );

        let rest: Vec<Value> = stream::iter(2..=total_pages)
            .map(|page| {
                let page_call = call.for_page(page, false);
                async move { self.executor.execute(&page_call).await }
            })
            .buffered(concurrency.max(1))
            .try_collect()
            .await?;

        let mut items = Vec::new();
        for page in std::iter::once(first_result).chain(rest) {
            append_page(&mut items, page);
        }
        Ok(Value::Array(items))
    }
}

fn append_page(items: &mut Vec<Value>, page: Value) {
    match page {
        Value::Array(values) => items.extend(values),
        other => items.push(other),
    }
}
