//! Bounded-concurrency scan of every source.
//!
//! Each source runs as its own tokio task: fetch, then synchronous
//! extraction. A [`Semaphore`] caps how many are in flight at once. Tasks
//! report back over an mpsc channel and the orchestrator, as the only
//! consumer, is the single place the [`RunResult`] is written.
//!
//! A task that fails (transport error, or a panic during extraction) is
//! logged and counts as zero matches; it never affects the other tasks.

use crate::error::{RunError, SourceError};
use crate::extract::Extractor;
use crate::fetch::Fetch;
use crate::models::{ExtractedArticle, Progress, RunResult, Source};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::{Semaphore, mpsc};
use tracing::{error, info, instrument, warn};

/// Default number of sources processed at the same time.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// What one source task sends back.
struct SourceOutcome {
    source: String,
    result: Result<Vec<ExtractedArticle>, SourceError>,
}

/// Runs the per-source pipeline across a pool of tasks.
pub struct Orchestrator<F> {
    fetcher: Arc<F>,
    extractor: Arc<Extractor>,
    concurrency: usize,
}

impl<F> Orchestrator<F>
where
    F: Fetch + 'static,
{
    pub fn new(fetcher: F, extractor: Extractor, concurrency: usize) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            extractor: Arc::new(extractor),
            concurrency: concurrency.max(1),
        }
    }

    /// Scan every source and collect the recent posts.
    ///
    /// At most `concurrency` sources are fetched at once. A source that fails
    /// is logged and reported through `on_progress` with zero matches.
    ///
    /// # Arguments
    ///
    /// * `sources` - The registry to scan
    /// * `on_progress` - Called once per finished source, in completion order,
    ///   with a strictly increasing `completed` count
    ///
    /// # Returns
    ///
    /// Every in-window article found, as a [`RunResult`].
    ///
    /// # Errors
    ///
    /// Returns [`RunError::EmptyRegistry`] if `sources` is empty. Per-source
    /// failures never surface here.
    #[instrument(level = "info", skip_all, fields(sources = sources.len(), concurrency = self.concurrency))]
    pub async fn run<P>(&self, sources: &[Source], mut on_progress: P) -> Result<RunResult, RunError>
    where
        P: FnMut(&Progress),
    {
        if sources.is_empty() {
            return Err(RunError::EmptyRegistry);
        }

        let total = sources.len();
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let (tx, mut rx) = mpsc::channel::<SourceOutcome>(self.concurrency * 2);

        for source in sources.iter().cloned() {
            let fetcher = Arc::clone(&self.fetcher);
            let extractor = Arc::clone(&self.extractor);
            let semaphore = Arc::clone(&semaphore);
            let tx = tx.clone();

            tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };
                let result = AssertUnwindSafe(process_source(&*fetcher, &extractor, &source))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|panic| Err(SourceError::Panicked(panic_message(&*panic))));
                let _ = tx
                    .send(SourceOutcome {
                        source: source.name,
                        result,
                    })
                    .await;
            });
        }

        // Close our sender so `recv` ends once every task has reported.
        drop(tx);

        let mut run = RunResult::default();
        let mut completed = 0usize;
        while let Some(outcome) = rx.recv().await {
            completed += 1;
            let (matches, error) = match outcome.result {
                Ok(articles) => {
                    let before = run.len();
                    run.extend(articles);
                    (run.len() - before, None)
                }
                Err(e) => {
                    error!(source = %outcome.source, error = %e, "Source failed");
                    (0, Some(e.to_string()))
                }
            };
            on_progress(&Progress {
                completed,
                total,
                source: outcome.source,
                matches,
                error,
            });
        }

        if completed < total {
            warn!(completed, total, "Some source tasks ended without reporting");
        }
        info!(articles = run.len(), completed, total, "Scan complete");
        Ok(run)
    }
}

/// Fetch one source and extract its recent posts.
pub async fn process_source<F: Fetch>(
    fetcher: &F,
    extractor: &Extractor,
    source: &Source,
) -> Result<Vec<ExtractedArticle>, SourceError> {
    let body = fetcher.fetch(&source.url).await?;
    Ok(extractor.extract_articles(&body, source))
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
