// Runtime configuration. Values come from the process environment, with an
// optional `.env` file in the working directory loaded first.

use crate::credential::CredentialStore;
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "https://api.stability.ai/v2beta/stable-image/generate/sd3";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub key_file: Option<PathBuf>,
    pub output_dir: PathBuf,
}

impl Config {
    /// Read `SUPERDUCK3_API_URL`, `SUPERDUCK3_KEY_FILE` and
    /// `SUPERDUCK3_OUTPUT_DIR`, falling back to the public endpoint, the
    /// home directory key file and the system temp dir.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        Config {
            api_url: non_empty("SUPERDUCK3_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into()),
            key_file: non_empty("SUPERDUCK3_KEY_FILE").map(PathBuf::from),
            output_dir: non_empty("SUPERDUCK3_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir),
        }
    }

    pub fn credential_store(&self) -> CredentialStore {
        match &self.key_file {
            Some(path) => CredentialStore::new(path),
            None => CredentialStore::default_location(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_when_unset() {
        let cfg = Config::from_lookup(|_| None);
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert!(cfg.key_file.is_none());
        assert_eq!(cfg.output_dir, std::env::temp_dir());
    }

    #[test]
    fn overrides_and_blank_values() {
        let vars: HashMap<&str, &str> = [
            ("SUPERDUCK3_API_URL", "http://127.0.0.1:9/gen"),
            ("SUPERDUCK3_KEY_FILE", "/tmp/key"),
            ("SUPERDUCK3_OUTPUT_DIR", "   "),
        ]
        .into_iter()
        .collect();
        let cfg = Config::from_lookup(|name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(cfg.api_url, "http://127.0.0.1:9/gen");
        assert_eq!(cfg.credential_store().path(), std::path::Path::new("/tmp/key"));
        assert_eq!(cfg.output_dir, std::env::temp_dir());
    }
}
