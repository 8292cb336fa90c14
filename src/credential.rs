// Credential store: one plaintext file holding the API key. The key is
// read back on the next run so the user only types it once.

use crate::models::Credential;
use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const KEY_FILE_NAME: &str = ".superduck3_key";

#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CredentialStore { path: path.into() }
    }

    /// Key file in the user's home directory, or the working directory
    /// when no home can be determined.
    pub fn default_location() -> Self {
        let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(dir.join(KEY_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored key. A missing or blank file yields `None`; any
    /// other I/O failure is returned as is.
    pub fn load(&self) -> Result<Option<Credential>> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", self.path.display()))
            }
        };
        if data.trim().is_empty() {
            return Ok(None);
        }
        let token = data.trim_end_matches(['\r', '\n']);
        Ok(Some(Credential::new(token)))
    }

    /// Return the stored key, or ask `acquire` for one and persist it.
    pub fn get<F>(&self, acquire: F) -> Result<Credential>
    where
        F: FnOnce() -> Result<String>,
    {
        if let Some(cred) = self.load()? {
            tracing::debug!(path = %self.path.display(), "using stored api key");
            return Ok(cred);
        }
        let token = acquire()?;
        self.set(&token)
    }

    /// Overwrite the key file with `token`.
    pub fn set(&self, token: &str) -> Result<Credential> {
        std::fs::write(&self.path, token)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        tracing::info!(path = %self.path.display(), "api key saved");
        Ok(Credential::new(token))
    }
}
