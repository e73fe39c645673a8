//! CLI for jretry: one positional argument, the sweep config file.

use anyhow::Result;
use clap::Parser;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Re-trigger Jenkins jobs whose last build did not succeed.
#[derive(Debug, Parser)]
#[command(name = "jretry", version)]
#[command(about = "Re-trigger idle Jenkins jobs whose last build failed", long_about = None)]
pub struct Cli {
    /// Sweep config: JSON, or TOML when the file ends in `.toml`.
    #[arg(value_name = "CONFIG_FILE")]
    pub config_file: PathBuf,
}

/// Parse `args` and hand the config path to `sweep`. Returns the exit code.
///
/// Usage errors print to stderr and return 1 without calling `sweep`.
/// `--help` and `--version` print to stdout and return 0.
pub fn run<I, T, F>(args: I, sweep: F) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    F: FnOnce(&Path) -> Result<()>,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() { 1 } else { 0 };
        }
    };

    match sweep(&cli.config_file) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("jretry error: {:#}", err);
            1
        }
    }
}
