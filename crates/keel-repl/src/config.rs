//! Shell configuration. Loaded from TOML with per-field defaults.

use keel_types::{Result, ShellError};
use serde::Deserialize;

/// REPL behavior knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct ShellConfig {
    /// Prompt string handed to the line source.
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// Maximum in-session history entries to retain.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Maximum "did you mean" suggestions appended to an error.
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
}

fn default_prompt() -> String {
    "> ".to_string()
}

fn default_history_limit() -> usize {
    100
}

fn default_max_suggestions() -> usize {
    3
}

impl Default for ShellConfig {
    fn default() -> Self {
        ShellConfig {
            prompt: default_prompt(),
            history_limit: default_history_limit(),
            max_suggestions: default_max_suggestions(),
        }
    }
}

impl ShellConfig {
    /// Parse a config from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| ShellError::Config(format!("shell config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let config = ShellConfig::from_toml("").unwrap();
        assert_eq!(config.prompt, "> ");
        assert_eq!(config.history_limit, 100);
        assert_eq!(config.max_suggestions, 3);
    }

    #[test]
    fn partial_toml_overrides_some_fields() {
        let config = ShellConfig::from_toml("prompt = \"keel% \"\nhistory_limit = 10").unwrap();
        assert_eq!(config.prompt, "keel% ");
        assert_eq!(config.history_limit, 10);
        assert_eq!(config.max_suggestions, 3);
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = ShellConfig::from_toml("prompt = ").unwrap_err();
        assert!(format!("{err}").starts_with("config error: shell config:"));
    }
}
