//! Sweep reporting. The controller calls a [`SweepReporter`] instead of
//! logging directly, so the log sink is chosen by whoever builds it.

use crate::controller::{JobState, SweepSummary};

pub trait SweepReporter {
    /// Called once per job after its three facts were queried.
    fn evaluated(&self, job: &str, state: &JobState);

    /// Called right before a rebuild is requested for `job`.
    fn retrying(&self, job: &str);

    /// Called after the last job of a sweep that did not abort.
    fn finished(&self, summary: &SweepSummary);
}

impl<R: SweepReporter + ?Sized> SweepReporter for &R {
    fn evaluated(&self, job: &str, state: &JobState) {
        (**self).evaluated(job, state)
    }

    fn retrying(&self, job: &str) {
        (**self).retrying(job)
    }

    fn finished(&self, summary: &SweepSummary) {
        (**self).finished(summary)
    }
}

/// Emits `tracing` events: debug per evaluation, info per trigger.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl SweepReporter for TracingReporter {
    fn evaluated(&self, job: &str, state: &JobState) {
        tracing::debug!(
            job,
            building = state.building,
            in_queue = state.in_queue,
            successful = state.last_build_successful,
            "evaluated job"
        );
    }

    fn retrying(&self, job: &str) {
        tracing::info!(job, "retrying");
    }

    fn finished(&self, summary: &SweepSummary) {
        tracing::info!(
            evaluated = summary.evaluated,
            triggered = summary.triggered.len(),
            "sweep finished"
        );
    }
}
