//! Relay configuration types for visabot.
//!
//! `RelayConfig` represents the optional `visabot.toml` file plus the
//! command-line overrides layered on top of it. Every field has a default,
//! so an empty file (or no file at all) yields a working configuration.

use serde::{Deserialize, Serialize};

/// The fixed system instruction sent when the chat session is opened.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are a helpful visa processing helper assistant. \
Your role is to assist users with visa-related queries such as documents required, procedure to \
apply, etc. for different countries in a clear and concise manner. If any question is out of visa \
processing, politely inform them that you can only assist with visa-related queries.";

/// Top-level configuration for the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Address the HTTP server binds to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the HTTP server binds to.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Model identifier passed to the remote service.
    #[serde(default = "default_model")]
    pub model: String,

    /// System instruction supplied once when the session is opened.
    #[serde(default = "default_system_instruction")]
    pub system_instruction: String,

    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Base URL of the generative-language API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Deadline for a single remote call, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_model() -> String {
    "gemini-flash-latest".to_string()
}

fn default_system_instruction() -> String {
    DEFAULT_SYSTEM_INSTRUCTION.to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            model: default_model(),
            system_instruction: default_system_instruction(),
            api_key_env: default_api_key_env(),
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl RelayConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
