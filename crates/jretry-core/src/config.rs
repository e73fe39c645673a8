use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// HTTP timeouts for calls to the CI server (optional `http` section).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Seconds allowed to establish the TCP/TLS connection.
    pub connect_timeout_secs: u64,
    /// Seconds allowed for a whole request, including the response body.
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            timeout_secs: 30,
        }
    }
}

impl HttpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Sweep configuration, loaded once from the file named on the command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Job names as known to the CI server, evaluated in this order.
    pub jobs: Vec<String>,
    /// File holding the password for `user`.
    pub pass_file: PathBuf,
    /// File that log lines are appended to.
    pub log_file: PathBuf,
    /// Base URL of the Jenkins instance.
    pub jenkins_url: String,
    /// Username for HTTP basic auth.
    pub user: String,
    /// Optional HTTP timeouts; built-in defaults when missing.
    #[serde(default)]
    pub http: HttpConfig,
}

impl Config {
    /// Checks the fields serde cannot: job names, a usable server URL and
    /// non-zero timeouts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (pos, job) in self.jobs.iter().enumerate() {
            check_job_name(job).map_err(|reason| ConfigError::Invalid {
                field: "jobs",
                reason: format!("entry {} ({:?}): {}", pos, job, reason),
            })?;
        }
        if self.user.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "user",
                reason: "must not be empty".to_string(),
            });
        }
        let url = url::Url::parse(&self.jenkins_url).map_err(|e| ConfigError::Invalid {
            field: "jenkins_url",
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                field: "jenkins_url",
                reason: format!("unsupported scheme `{}`", url.scheme()),
            });
        }
        // curl reads 0 as "no timeout".
        if self.http.connect_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "http.connect_timeout_secs",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.http.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "http.timeout_secs",
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

/// A job name is one or more `/`-separated folder parts. Parts must be
/// non-empty and not `.` or `..`; the name has no surrounding whitespace.
pub fn check_job_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("is empty".to_string());
    }
    if name.trim() != name {
        return Err("has leading or trailing whitespace".to_string());
    }
    if let Some(part) = name
        .split('/')
        .find(|p| p.is_empty() || *p == "." || *p == "..")
    {
        return Err(format!("invalid path part {:?}", part));
    }
    Ok(())
}

/// Load and validate configuration from `path`.
///
/// `.toml` files are parsed as TOML; anything else is parsed as JSON.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg = parse(path, &data)?;
    cfg.validate()?;
    Ok(cfg)
}

fn parse(path: &Path, data: &str) -> Result<Config, ConfigError> {
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let parsed = if is_toml {
        toml::from_str(data).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(data).map_err(|e| e.to_string())
    };
    parsed.map_err(|message| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    })
}
