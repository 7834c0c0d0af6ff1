use anyhow::{Context, Result};
use once_cell::sync::Lazy;

use crate::html_table;
use crate::http_client::http_client;
use crate::page_cache::TtlCache;

const DEFAULT_LIVE_URL: &str = "https://www.aceodds.com/pt/bet365-transmissao-ao-vivo.html";
const DEFAULT_RESULTS_URL: &str = "https://www.fifastats.net/resultados";

static PAGE_ROWS: Lazy<TtlCache<Vec<Vec<String>>>> = Lazy::new(TtlCache::with_default_ttl);

pub fn live_url() -> String {
    std::env::var("LIVE_URL").unwrap_or_else(|_| DEFAULT_LIVE_URL.to_string())
}

pub fn results_url() -> String {
    std::env::var("RESULTS_URL").unwrap_or_else(|_| DEFAULT_RESULTS_URL.to_string())
}

/// Plain GET with the shared client. No retries; the caller decides how a
/// failure degrades.
pub fn fetch_page(url: &str) -> Result<String> {
    let client = http_client()?;
    let resp = client
        .get(url)
        .send()
        .with_context(|| format!("request to {url} failed"))?;
    let resp = resp
        .error_for_status()
        .with_context(|| format!("bad status from {url}"))?;
    resp.text().context("failed reading body")
}

/// Fetches a page and extracts its table rows, memoized per URL for the cache
/// TTL window. Any network or parse failure is logged and becomes an empty
/// row set; downstream treats empty as "no data", never as a distinct error.
pub fn fetch_rows(url: &str) -> Vec<Vec<String>> {
    PAGE_ROWS.get_or_compute(url, || match fetch_page(url) {
        Ok(body) => {
            let rows = html_table::extract_rows(&body);
            tracing::debug!(url = %url, rows = rows.len(), "extracted table rows");
            rows
        }
        Err(err) => {
            tracing::warn!(url = %url, error = %err, "page fetch failed");
            Vec::new()
        }
    })
}

/// Forgets every cached page so the next render cycle refetches.
pub fn invalidate_cache() {
    PAGE_ROWS.clear();
}
