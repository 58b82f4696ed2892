//! HTTP fetching of source listing pages.
//!
//! Every request picks a browser User-Agent at random from a small pool so
//! that consecutive requests don't share one fingerprint. A request gets one
//! attempt with a fixed timeout; any failure is returned as a [`FetchError`]
//! and never escapes as a panic.

use crate::error::FetchError;
use rand::seq::IndexedRandom;
use reqwest::Client;
use reqwest::header::USER_AGENT;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Browser identities rotated across requests.
const USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:123.0) Gecko/20100101 Firefox/123.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.0.0",
];

/// Body of a fetched page, or why it couldn't be fetched.
pub type FetchResult = Result<String, FetchError>;

/// Something that can GET a page.
///
/// The orchestrator is generic over this trait so it can be driven by an
/// in-memory implementation in tests.
pub trait Fetch: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = FetchResult> + Send;
}

/// Pick one of the pooled User-Agent strings.
pub fn pick_user_agent() -> &'static str {
    USER_AGENTS.choose(&mut rand::rng()).copied().unwrap_or(USER_AGENTS[0])
}

/// [`Fetch`] implementation backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, timeout })
    }
}

impl Fetch for HttpFetcher {
    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, url: &str) -> FetchResult {
        let t0 = Instant::now();
        let agent = pick_user_agent();

        let result: FetchResult = async {
            let response = self
                .client
                .get(url)
                .header(USER_AGENT, agent)
                .send()
                .await
                .map_err(|e| self.classify(url, e))?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status,
                });
            }

            response.text().await.map_err(|e| self.classify(url, e))
        }
        .await;

        let elapsed_ms = t0.elapsed().as_millis();
        match &result {
            Ok(body) => debug!(elapsed_ms, bytes = body.len(), "Fetched page"),
            Err(e) => warn!(elapsed_ms, error = %e, "Fetch failed"),
        }
        result
    }
}

impl HttpFetcher {
    fn classify(&self, url: &str, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                secs: self.timeout.as_secs(),
            }
        } else {
            FetchError::Transport {
                url: url.to_string(),
                source: error,
            }
        }
    }
}
