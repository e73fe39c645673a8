//! Retry controller: evaluate each configured job and re-trigger idle
//! jobs whose last build did not succeed.
//!
//! Jobs are processed strictly in order. The first query or trigger failure
//! aborts the sweep; later jobs are not evaluated.

use crate::client::JobQueryClient;
use crate::error::{ClientError, SweepError};
use crate::report::SweepReporter;

/// Facts about one job, queried fresh on every sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobState {
    pub building: bool,
    pub in_queue: bool,
    pub last_build_successful: bool,
}

impl JobState {
    /// Idle (not building, not queued) and last build not a success.
    pub fn needs_retry(&self) -> bool {
        !self.building && !self.in_queue && !self.last_build_successful
    }
}

/// Outcome of a completed sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepSummary {
    /// Number of jobs evaluated.
    pub evaluated: usize,
    /// Jobs a rebuild was requested for, in order.
    pub triggered: Vec<String>,
}

pub struct RetryController<C, R> {
    client: C,
    reporter: R,
}

impl<C: JobQueryClient, R: SweepReporter> RetryController<C, R> {
    pub fn new(client: C, reporter: R) -> Self {
        Self { client, reporter }
    }

    /// Query the job's state. Three separate requests, so the state may
    /// change between them.
    pub fn job_state(&self, job: &str) -> Result<JobState, SweepError> {
        let query = |source: ClientError| SweepError::Query {
            job: job.to_string(),
            source,
        };
        let building = self.client.last_build(job).map_err(query)?.building;
        let in_queue = self.client.job_info(job).map_err(query)?.in_queue;
        let last_build_successful = self.client.last_build(job).map_err(query)?.is_success();
        Ok(JobState {
            building,
            in_queue,
            last_build_successful,
        })
    }

    pub fn needs_retry(&self, job: &str) -> Result<bool, SweepError> {
        let state = self.job_state(job)?;
        self.reporter.evaluated(job, &state);
        Ok(state.needs_retry())
    }

    /// Request a rebuild without waiting for it to be accepted or started.
    pub fn trigger(&self, job: &str) -> Result<(), SweepError> {
        self.reporter.retrying(job);
        self.client.build(job).map_err(|source| SweepError::Trigger {
            job: job.to_string(),
            source,
        })
    }

    pub fn run<S: AsRef<str>>(&self, jobs: &[S]) -> Result<SweepSummary, SweepError> {
        let mut summary = SweepSummary::default();
        for job in jobs {
            let job = job.as_ref();
            let retry = self.needs_retry(job)?;
            summary.evaluated += 1;
            if retry {
                self.trigger(job)?;
                summary.triggered.push(job.to_string());
            }
        }
        self.reporter.finished(&summary);
        Ok(summary)
    }
}
