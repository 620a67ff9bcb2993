use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::providers::http_errors::model_api_request_error;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct PullRequest<'a> {
    name: &'a str,
}

fn generate_url(base_url: &str) -> String {
    format!("{}/api/generate", base_url.trim_end_matches('/'))
}

fn pull_url(base_url: &str) -> String {
    format!("{}/api/pull", base_url.trim_end_matches('/'))
}

fn post_raw<T: Serialize>(client: &Client, cfg: &Config, api_url: &str, body: &T) -> Result<String> {
    let response = client.post(api_url).json(body).send().map_err(|err| {
        warn!(
            api_url = %api_url,
            model = %cfg.model,
            error = %err,
            "ollama request failed"
        );
        model_api_request_error(err, api_url, cfg.model_timeout_secs)
    })?;

    // Non-success statuses are not errors here: the server's body (which
    // carries the failure detail) is handed back to the caller as-is.
    let status = response.status();
    if !status.is_success() {
        warn!(
            api_url = %api_url,
            model = %cfg.model,
            status = %status,
            "ollama returned non-success status"
        );
    }

    response
        .text()
        .context("Failed to read model response body")
}

/// Send a generation request, returning the raw response body.
pub fn generate(client: &Client, cfg: &Config, prompt: &str, system: &str) -> Result<String> {
    let api_url = generate_url(&cfg.model_base_url);
    let body = GenerateRequest {
        model: &cfg.model,
        prompt,
        system,
        stream: false,
    };
    debug!(
        api_url = %api_url,
        model = %cfg.model,
        prompt_len = prompt.len(),
        system_len = system.len(),
        "sending ollama generate request"
    );

    let raw = post_raw(client, cfg, &api_url, &body)?;
    debug!(model = %cfg.model, response_len = raw.len(), "received ollama generate response");
    Ok(raw)
}

/// Ask the server to download the configured model, returning the raw
/// response body.
pub fn pull(client: &Client, cfg: &Config) -> Result<String> {
    let api_url = pull_url(&cfg.model_base_url);
    let body = PullRequest { name: &cfg.model };
    debug!(api_url = %api_url, model = %cfg.model, "sending ollama pull request");

    let raw = post_raw(client, cfg, &api_url, &body)?;
    debug!(model = %cfg.model, response_len = raw.len(), "received ollama pull response");
    Ok(raw)
}

/// Pull the generated text out of a raw generate response.
///
/// Anything that does not parse as a JSON object with a string `response`
/// field is returned unchanged, so callers always get something printable.
pub fn extract_generated_text(raw: &str) -> String {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(fields)) => match fields.get("response") {
            Some(Value::String(text)) => text.clone(),
            _ => raw.to_string(),
        },
        _ => raw.to_string(),
    }
}
