mod cli;

use anyhow::Context;
use jretry_core::client::JenkinsClient;
use jretry_core::sweep;

fn main() {
    let code = cli::run(std::env::args_os(), |config_file| {
        sweep::run(config_file, JenkinsClient::connect)
            .with_context(|| format!("retry sweep for {}", config_file.display()))?;
        Ok(())
    });
    std::process::exit(code);
}
