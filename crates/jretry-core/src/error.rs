//! Error taxonomy for a retry sweep.
//!
//! Config and credential errors are fatal before any network activity.
//! Query and trigger errors abort the sweep at the failing job.

use std::io;
use std::path::PathBuf;

/// Configuration file missing, unreadable, malformed, or invalid.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("parse config {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
    #[error("invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Credential file missing or unreadable.
#[derive(Debug, thiserror::Error)]
#[error("read credential {}: {source}", .path.display())]
pub struct CredentialError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Failure talking to the CI server.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid url: {0}")]
    Url(String),
    #[error(transparent)]
    Transport(#[from] curl::Error),
    #[error("{method} {url} returned HTTP {status}")]
    Http {
        method: &'static str,
        url: String,
        status: u32,
    },
    #[error("decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A per-job failure that aborts the sweep.
#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    #[error("query job `{job}`")]
    Query {
        job: String,
        #[source]
        source: ClientError,
    },
    #[error("trigger job `{job}`")]
    Trigger {
        job: String,
        #[source]
        source: ClientError,
    },
}

impl SweepError {
    /// Name of the job the sweep stopped at.
    pub fn job(&self) -> &str {
        match self {
            SweepError::Query { job, .. } | SweepError::Trigger { job, .. } => job,
        }
    }
}

/// Top-level error for [`crate::sweep::run`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Credential(#[from] CredentialError),
    #[error("open log file {}: {source}", .path.display())]
    Logging {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("connect to CI server")]
    Client(#[source] ClientError),
    #[error(transparent)]
    Sweep(#[from] SweepError),
}
