use concierge_core::config::{AppConfig, LlmProvider, LoadOptions};
use secrecy::ExposeSecret;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> String {
    let report = build_report();

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_chat_bridge(&config));
            checks.push(check_llm_provider(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(DoctorCheck {
                name: "chat_bridge_readiness",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
            checks.push(DoctorCheck {
                name: "llm_provider_readiness",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_chat_bridge(config: &AppConfig) -> DoctorCheck {
    if config.chat.callback_token.expose_secret().is_empty() {
        return DoctorCheck {
            name: "chat_bridge_readiness",
            status: CheckStatus::Fail,
            details: "chat.callback_token is empty; inbound callbacks cannot be authenticated"
                .to_string(),
        };
    }

    DoctorCheck {
        name: "chat_bridge_readiness",
        status: CheckStatus::Pass,
        details: format!("bridge endpoint {} with tokens present", config.chat.api_base_url),
    }
}

fn check_llm_provider(config: &AppConfig) -> DoctorCheck {
    let details = match config.llm.provider {
        LlmProvider::Ollama => format!(
            "ollama model `{}` at {}",
            config.llm.model,
            config.llm.base_url.as_deref().unwrap_or("<unset>")
        ),
        LlmProvider::OpenAi | LlmProvider::Anthropic => {
            format!("hosted provider with model `{}` and api key present", config.llm.model)
        }
    };

    DoctorCheck { name: "llm_provider_readiness", status: CheckStatus::Pass, details }
}

fn render_human(report: &DoctorReport) -> String {
    let mut output = String::new();
    output.push_str(&report.summary);
    output.push('\n');

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "FAIL",
            CheckStatus::Skipped => "skip",
        };
        output.push_str(&format!("  [{marker}] {} - {}\n", check.name, check.details));
    }

    output
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
