//! One retry sweep end to end: config, log sink, credential, client, jobs.

use std::path::Path;

use crate::client::JobQueryClient;
use crate::config::{self, Config};
use crate::controller::{RetryController, SweepSummary};
use crate::credential::{self, Credential};
use crate::error::{ClientError, Error};
use crate::logging;
use crate::report::TracingReporter;

/// Run a sweep for the config file at `config_path`.
///
/// `connect` builds the client session and is called exactly once, only
/// after the config and credential were read successfully. Log lines go to
/// the configured log file while the sweep runs.
pub fn run<C, F>(config_path: &Path, connect: F) -> Result<SweepSummary, Error>
where
    C: JobQueryClient,
    F: FnOnce(&Config, Credential) -> Result<C, ClientError>,
{
    let cfg = config::load(config_path)?;
    let subscriber = logging::file_subscriber(&cfg.log_file).map_err(|source| Error::Logging {
        path: cfg.log_file.clone(),
        source,
    })?;

    tracing::subscriber::with_default(subscriber, || {
        tracing::debug!(
            config = %config_path.display(),
            server = %cfg.jenkins_url,
            jobs = cfg.jobs.len(),
            "starting sweep"
        );
        let credential = credential::read(&cfg.pass_file)?;
        let client = connect(&cfg, credential).map_err(Error::Client)?;
        let controller = RetryController::new(client, TracingReporter);
        controller.run(&cfg.jobs).map_err(|e| {
            tracing::error!(
                job = e.job(),
                error = &e as &dyn std::error::Error,
                "sweep aborted"
            );
            Error::Sweep(e)
        })
    })
}
