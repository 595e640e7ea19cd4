use concierge_core::config::{AppConfig, LoadOptions};
use secrecy::ExposeSecret;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct EffectiveConfig {
    chat: ChatView,
    llm: LlmView,
    server: ServerView,
    logging: LoggingView,
}

#[derive(Debug, Serialize)]
struct ChatView {
    api_base_url: String,
    api_token: &'static str,
    callback_token: &'static str,
    timeout_secs: u64,
}

#[derive(Debug, Serialize)]
struct LlmView {
    provider: String,
    model: String,
    base_url: Option<String>,
    api_key: &'static str,
    timeout_secs: u64,
    max_retries: u32,
}

#[derive(Debug, Serialize)]
struct ServerView {
    bind_address: String,
    port: u16,
    graceful_shutdown_secs: u64,
}

#[derive(Debug, Serialize)]
struct LoggingView {
    level: String,
    format: String,
}

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return super::CommandResult::failure("config", "config_load", error.to_string(), 1)
                .output
        }
    };

    let view = EffectiveConfig {
        chat: ChatView {
            api_base_url: config.chat.api_base_url.clone(),
            api_token: redact(!config.chat.api_token.expose_secret().is_empty()),
            callback_token: redact(!config.chat.callback_token.expose_secret().is_empty()),
            timeout_secs: config.chat.timeout_secs,
        },
        llm: LlmView {
            provider: format!("{:?}", config.llm.provider).to_ascii_lowercase(),
            model: config.llm.model.clone(),
            base_url: config.llm.base_url.clone(),
            api_key: redact(
                config
                    .llm
                    .api_key
                    .as_ref()
                    .map(|key| !key.expose_secret().is_empty())
                    .unwrap_or(false),
            ),
            timeout_secs: config.llm.timeout_secs,
            max_retries: config.llm.max_retries,
        },
        server: ServerView {
            bind_address: config.server.bind_address.clone(),
            port: config.server.port,
            graceful_shutdown_secs: config.server.graceful_shutdown_secs,
        },
        logging: LoggingView {
            level: config.logging.level.clone(),
            format: format!("{:?}", config.logging.format).to_ascii_lowercase(),
        },
    };

    serde_json::to_string_pretty(&view)
        .unwrap_or_else(|error| format!("{{\"status\":\"error\",\"message\":\"{error}\"}}"))
}

fn redact(present: bool) -> &'static str {
    if present {
        "<redacted>"
    } else {
        "<unset>"
    }
}
