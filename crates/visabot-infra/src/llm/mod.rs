//! LLM provider implementations and session bootstrap.
//!
//! Contains the Gemini implementation of the [`LlmProvider`] trait and the
//! one-shot startup routine ([`init_relay`]) that opens the shared chat
//! session. Startup never fails: a missing key or a broken client leaves
//! the relay in its unavailable state with the reason recorded.
//!
//! [`LlmProvider`]: visabot_core::llm::provider::LlmProvider

pub mod gemini;

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use tracing::{error, info};

use visabot_core::chat::relay::ChatRelay;
use visabot_core::chat::session::ChatSession;
use visabot_core::llm::box_provider::BoxLlmProvider;
use visabot_types::config::RelayConfig;
use visabot_types::error::SessionUnavailableReason;

use self::gemini::GeminiProvider;

use crate::secret::env::EnvSecretProvider;

/// Open the chat session described by `config`.
///
/// No key means [`SessionUnavailableReason::MissingCredential`]; an HTTP
/// client that cannot be built means [`SessionUnavailableReason::InitFailed`].
/// Nothing is retried.
pub fn open_session(
    config: &RelayConfig,
    api_key: Option<SecretString>,
) -> Result<ChatSession, SessionUnavailableReason> {
    let key = api_key.ok_or(SessionUnavailableReason::MissingCredential)?;

    let provider = GeminiProvider::new(key, config.model.clone())
        .map_err(|e| SessionUnavailableReason::InitFailed(e.to_string()))?
        .with_base_url(config.base_url.clone());

    Ok(ChatSession::open(
        BoxLlmProvider::new(provider),
        config.model.clone(),
        config.system_instruction.clone(),
    ))
}

/// Build the relay at process startup.
///
/// Resolves the API key from the environment variable named by
/// `config.api_key_env`, opens the session, and logs a diagnostic when
/// either step fails. Always returns a relay.
pub fn init_relay(config: &RelayConfig) -> ChatRelay {
    init_relay_with(config, EnvSecretProvider::new().get(&config.api_key_env))
}

/// [`init_relay`] with an already-resolved key.
pub fn init_relay_with(config: &RelayConfig, api_key: Option<SecretString>) -> ChatRelay {
    let timeout = Duration::from_secs(config.request_timeout_secs);

    if api_key.is_none() {
        error!(
            env_var = %config.api_key_env,
            "API key not found in environment variables"
        );
    }

    match open_session(config, api_key) {
        Ok(session) => {
            info!(
                session_id = %session.id(),
                model = %session.model(),
                provider = session.provider_name(),
                "Chat session opened"
            );
            ChatRelay::new(Ok(Arc::new(session)), timeout)
        }
        Err(reason) => {
            error!(reason = %reason, "Failed to initialize chat session");
            ChatRelay::unavailable(reason, timeout)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_session_without_key() {
        let result = open_session(&RelayConfig::default(), None);
        assert!(matches!(
            result,
            Err(SessionUnavailableReason::MissingCredential)
        ));
    }

    #[test]
    fn test_open_session_with_key() {
        let config = RelayConfig::default();
        let session = open_session(&config, Some(SecretString::from("gemini-key"))).unwrap();
        assert_eq!(session.model(), "gemini-flash-latest");
        assert_eq!(session.provider_name(), "gemini");
        assert!(session.system_instruction().contains("visa"));
        assert_eq!(session.history_len(), 0);
    }

    #[test]
    fn test_init_relay_with_missing_key_is_unavailable() {
        let config = RelayConfig {
            request_timeout_secs: 5,
            ..RelayConfig::default()
        };
        let relay = init_relay_with(&config, None);
        assert!(!relay.is_available());
        assert_eq!(relay.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_init_relay_with_key_is_available() {
        let relay = init_relay_with(&RelayConfig::default(), Some(SecretString::from("k")));
        assert!(relay.is_available());
        assert_eq!(relay.session().unwrap().model(), "gemini-flash-latest");
    }
}
