//! Re-trigger Jenkins jobs whose last build failed.
//!
//! A sweep loads the config, opens the log file, reads the password, and
//! for each configured job asks the server whether it is building, queued,
//! or last succeeded. Idle jobs whose last build did not succeed get a new
//! build requested.

pub mod client;
pub mod config;
pub mod controller;
pub mod credential;
pub mod error;
pub mod logging;
pub mod report;
pub mod sweep;

pub use error::Error;
