//! Environment variable secret provider.
//!
//! A read-only lookup that checks environment variables and wraps the value
//! in a [`SecretString`] so it never reaches logs or `Debug` output.
//! [`load_dotenv`] seeds the environment from a `.env` file first.

use std::path::{Path, PathBuf};

use secrecy::SecretString;
use tracing::{debug, warn};

/// Load variables from a `.env` file into the process environment.
///
/// With `path` set, only that file is read. Otherwise `.env` is searched for
/// in the current directory and its ancestors. Variables already present in
/// the environment are left untouched. Returns the file that was loaded.
pub fn load_dotenv(path: Option<&Path>) -> Option<PathBuf> {
    let result = match path {
        Some(file) => dotenvy::from_path(file).map(|()| file.to_path_buf()),
        None => dotenvy::dotenv(),
    };

    match result {
        Ok(loaded) => {
            debug!(path = %loaded.display(), "Loaded .env file");
            Some(loaded)
        }
        Err(err) if err.not_found() => {
            debug!("No .env file found");
            None
        }
        Err(err) => {
            warn!(error = %err, "Failed to load .env file");
            None
        }
    }
}

/// Environment variable secret provider.
pub struct EnvSecretProvider;

impl EnvSecretProvider {
    /// Create a new environment variable secret provider.
    pub fn new() -> Self {
        Self
    }

    /// Look up `key` as an environment variable name.
    ///
    /// Unset, empty, and non-Unicode values all count as absent.
    pub fn get(&self, key: &str) -> Option<SecretString> {
        match std::env::var(key) {
            Ok(val) if !val.trim().is_empty() => Some(SecretString::from(val)),
            Ok(_) => None,
            Err(std::env::VarError::NotPresent | std::env::VarError::NotUnicode(_)) => None,
        }
    }
}

impl Default for EnvSecretProvider {
    fn default() -> Self {
        Self::new()
    }
}
