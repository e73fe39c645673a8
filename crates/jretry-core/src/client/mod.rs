//! Job query client: the three CI server capabilities a sweep needs.
//!
//! [`JenkinsClient`] talks to the Jenkins REST API; tests substitute their own
//! implementation of [`JobQueryClient`].

mod jenkins;

pub use jenkins::JenkinsClient;

use serde::Deserialize;

use crate::error::ClientError;

/// Terminal status of a build as reported by Jenkins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildResult {
    Success,
    Failure,
    Unstable,
    Aborted,
    NotBuilt,
    #[serde(other)]
    Unknown,
}

/// Subset of `lastBuild/api/json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LastBuild {
    pub building: bool,
    /// `None` while the build is running or when Jenkins reports `null`.
    #[serde(default)]
    pub result: Option<BuildResult>,
}

impl LastBuild {
    pub fn is_success(&self) -> bool {
        self.result == Some(BuildResult::Success)
    }
}

/// Subset of the job-level `api/json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JobInfo {
    #[serde(rename = "inQueue")]
    pub in_queue: bool,
}

/// Capability set the retry controller relies on.
///
/// Calls are blocking; no state is shared between them beyond the session.
pub trait JobQueryClient {
    /// Metadata of the job's most recent build.
    fn last_build(&self, job: &str) -> Result<LastBuild, ClientError>;

    /// Job-level metadata, including whether a build is queued.
    fn job_info(&self, job: &str) -> Result<JobInfo, ClientError>;

    /// Ask the server to schedule a new build. Acceptance is not awaited.
    fn build(&self, job: &str) -> Result<(), ClientError>;
}

impl<C: JobQueryClient + ?Sized> JobQueryClient for &C {
    fn last_build(&self, job: &str) -> Result<LastBuild, ClientError> {
        (**self).last_build(job)
    }

    fn job_info(&self, job: &str) -> Result<JobInfo, ClientError> {
        (**self).job_info(job)
    }

    fn build(&self, job: &str) -> Result<(), ClientError> {
        (**self).build(job)
    }
}
