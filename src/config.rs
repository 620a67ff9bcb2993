use std::env;

const DEFAULT_MODEL_PROVIDER: &str = "ollama";
const DEFAULT_MODEL: &str = "llama3.2";
const DEFAULT_MODEL_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_SYSTEM_PROMPT: &str = "";
const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 60;

/// Runtime configuration for the client.
///
/// The endpoint is a plain config value rather than a constant so tests can
/// point a session at a throwaway local server.
#[derive(Debug, Clone)]
pub struct Config {
    pub model_provider: String,
    pub model: String,
    pub model_base_url: String,
    pub system_prompt: String,
    pub model_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_env_with(|key| env::var(key).ok())
    }

    fn from_env_with(mut get_var: impl FnMut(&str) -> Option<String>) -> Self {
        Self {
            model_provider: get_var("MODEL_PROVIDER")
                .unwrap_or_else(|| DEFAULT_MODEL_PROVIDER.to_string()),
            model: get_var("MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            model_base_url: get_var("MODEL_BASE_URL")
                .unwrap_or_else(|| DEFAULT_MODEL_BASE_URL.to_string()),
            system_prompt: get_var("SYSTEM_PROMPT")
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            model_timeout_secs: parse_model_timeout_secs(get_var("MODEL_TIMEOUT_SECS").as_deref()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_provider: DEFAULT_MODEL_PROVIDER.to_string(),
            model: DEFAULT_MODEL.to_string(),
            model_base_url: DEFAULT_MODEL_BASE_URL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            model_timeout_secs: DEFAULT_MODEL_TIMEOUT_SECS,
        }
    }
}

fn parse_model_timeout_secs(raw: Option<&str>) -> u64 {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_MODEL_TIMEOUT_SECS)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{
        Config, DEFAULT_MODEL, DEFAULT_MODEL_BASE_URL, DEFAULT_MODEL_PROVIDER,
        DEFAULT_MODEL_TIMEOUT_SECS, DEFAULT_SYSTEM_PROMPT, parse_model_timeout_secs,
    };

    fn config_from_pairs(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        Config::from_env_with(|key| vars.get(key).cloned())
    }

    #[test]
    fn from_env_uses_defaults_when_vars_are_missing() {
        let cfg = config_from_pairs(&[]);
        assert_eq!(cfg.model_provider, DEFAULT_MODEL_PROVIDER);
        assert_eq!(cfg.model, DEFAULT_MODEL);
        assert_eq!(cfg.model_base_url, DEFAULT_MODEL_BASE_URL);
        assert_eq!(cfg.system_prompt, DEFAULT_SYSTEM_PROMPT);
        assert_eq!(cfg.model_timeout_secs, DEFAULT_MODEL_TIMEOUT_SECS);
    }

    #[test]
    fn from_env_reads_configured_values() {
        let cfg = config_from_pairs(&[
            ("MODEL_PROVIDER", "custom"),
            ("MODEL", "mistral:7b"),
            ("MODEL_BASE_URL", "http://localhost:9999"),
            ("SYSTEM_PROMPT", "You are terse."),
            ("MODEL_TIMEOUT_SECS", "15"),
        ]);

        assert_eq!(cfg.model_provider, "custom");
        assert_eq!(cfg.model, "mistral:7b");
        assert_eq!(cfg.model_base_url, "http://localhost:9999");
        assert_eq!(cfg.system_prompt, "You are terse.");
        assert_eq!(cfg.model_timeout_secs, 15);
    }

    #[test]
    fn parse_model_timeout_secs_uses_default_for_missing_or_invalid_values() {
        assert_eq!(parse_model_timeout_secs(None), DEFAULT_MODEL_TIMEOUT_SECS);
        assert_eq!(
            parse_model_timeout_secs(Some("")),
            DEFAULT_MODEL_TIMEOUT_SECS
        );
        assert_eq!(
            parse_model_timeout_secs(Some("not-a-number")),
            DEFAULT_MODEL_TIMEOUT_SECS
        );
        assert_eq!(
            parse_model_timeout_secs(Some("0")),
            DEFAULT_MODEL_TIMEOUT_SECS
        );
    }

    #[test]
    fn parse_model_timeout_secs_accepts_positive_integer() {
        assert_eq!(parse_model_timeout_secs(Some("45")), 45);
        assert_eq!(parse_model_timeout_secs(Some("  90  ")), 90);
    }
}
