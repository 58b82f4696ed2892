//! Error types for the fetch, registry and orchestration boundaries.
//!
//! Each stage of the pipeline surfaces its own error type so callers can tell
//! a transport failure from a misconfigured registry. None of these errors is
//! fatal to a run except [`RunError::EmptyRegistry`] and the registry load
//! errors raised before the run starts.

use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single HTTP GET against a source.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out after {secs}s")]
    Timeout { url: String, secs: u64 },

    /// The server answered with a non-2xx status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: StatusCode },

    /// DNS, TLS, connection reset, body decoding and everything else.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Problems found while loading the source registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("could not read source registry {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed source registry: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("source registry contains no sources")]
    Empty,

    #[error("source name {0:?} appears more than once")]
    DuplicateName(String),

    #[error("source {name:?} has an invalid url {url:?}: {source}")]
    InvalidUrl {
        name: String,
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Why one source contributed zero articles.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The extraction pipeline panicked; the message is the panic payload.
    #[error("extraction panicked: {0}")]
    Panicked(String),
}

/// Errors that stop a run before any source is processed.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("no sources to scan")]
    EmptyRegistry,
}
