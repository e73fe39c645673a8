//! Password file loading.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::CredentialError;

/// Secret read from the password file. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Read the whole file and drop every `\n` in it. Other whitespace is kept.
pub fn read(path: &Path) -> Result<Credential, CredentialError> {
    let raw = fs::read_to_string(path).map_err(|source| CredentialError {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Credential(raw.replace('\n', "")))
}
