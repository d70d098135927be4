use bytes::Bytes;
use serde::Serialize;

use crate::templates::{self, Template};

/// Fixed location of the generated service worker script.
pub const SERVICE_WORKER_FILE: &str = "serviceWorker.js";

#[derive(Debug, Serialize)]
struct Context<'a> {
    start_url: &'a str,
    cache_name: &'a str,
}

/// Renders the caching service worker.
///
/// On install it opens the `cache_namespace` cache, pre-caches `start_url` and
/// skips the waiting phase. On activate it claims every open client. Fetches
/// are answered from the cache when a match exists and from the network
/// otherwise.
pub fn render(start_url: &str, cache_namespace: &str) -> Result<Bytes, minijinja::Error> {
    templates::render(
        Template::ServiceWorker,
        Context {
            start_url,
            cache_name: cache_namespace,
        },
    )
    .map(Bytes::from)
}
