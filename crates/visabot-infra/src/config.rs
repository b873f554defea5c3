//! Configuration file loader for visabot.
//!
//! Reads an optional TOML file and deserializes it into [`RelayConfig`].
//! Falls back to defaults when no file is given, the file is missing, or
//! it is malformed.

use std::path::Path;

use visabot_types::config::RelayConfig;

/// Load relay configuration from `path`.
///
/// - If `path` is `None`, returns [`RelayConfig::default()`].
/// - If the file does not exist, returns the default.
/// - If the file exists but fails to read or parse, logs a warning and returns the default.
pub async fn load_config(path: Option<&Path>) -> RelayConfig {
    let Some(config_path) = path else {
        return RelayConfig::default();
    };

    let content = match tokio::fs::read_to_string(config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config found at {}, using defaults", config_path.display());
            return RelayConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return RelayConfig::default();
        }
    };

    match toml::from_str::<RelayConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            RelayConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_without_path_returns_default() {
        let config = load_config(None).await;
        assert_eq!(config, RelayConfig::default());
    }

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(Some(&tmp.path().join("visabot.toml"))).await;
        assert_eq!(config, RelayConfig::default());
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("visabot.toml");
        tokio::fs::write(
            &config_path,
            r#"
host = "0.0.0.0"
port = 8080
request_timeout_secs = 15
"#,
        )
        .await
        .unwrap();

        let config = load_config(Some(&config_path)).await;
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.request_timeout_secs, 15);
        assert_eq!(config.model, "gemini-flash-latest");
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("visabot.toml");
        tokio::fs::write(&config_path, "port = \"not a number\"")
            .await
            .unwrap();

        let config = load_config(Some(&config_path)).await;
        assert_eq!(config, RelayConfig::default());
    }
}
