//! Configuration for chat providers

use serde::{Deserialize, Serialize};

/// Top-level chat configuration, one section per vendor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatConfig {
    /// OpenAI section
    #[serde(default)]
    pub openai: Option<OpenAiChatConfig>,

    /// Anthropic section
    #[serde(default)]
    pub anthropic: Option<AnthropicConfig>,
}

impl ChatConfig {
    /// Validate every configured section
    ///
    /// # Errors
    ///
    /// Returns a message naming the invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(openai) = &self.openai {
            openai.validate()?;
        }
        if let Some(anthropic) = &self.anthropic {
            anthropic.validate()?;
        }
        Ok(())
    }
}

/// OpenAI chat settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiChatConfig {
    /// API key
    pub api_key: String,

    /// API base URL (for custom endpoints)
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    /// Default model
    #[serde(default = "default_openai_model")]
    pub model: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl OpenAiChatConfig {
    /// Minimal config from an API key
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_openai_base_url(),
            model: default_openai_model(),
            timeout_ms: default_timeout_ms(),
        }
    }

    /// Validate the section
    ///
    /// # Errors
    ///
    /// Returns a message naming the invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.is_empty() {
            return Err("OpenAI API key must not be empty".to_string());
        }
        if self.timeout_ms == 0 {
            return Err("OpenAI timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Anthropic chat settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicConfig {
    /// API key (sent as `x-api-key`)
    pub api_key: String,

    /// API base URL
    #[serde(default = "default_anthropic_base_url")]
    pub base_url: String,

    /// Default model
    #[serde(default = "default_anthropic_model")]
    pub model: String,

    /// Token cap applied when the request does not set one; the messages
    /// API requires an explicit value.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl AnthropicConfig {
    /// Minimal config from an API key
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_anthropic_base_url(),
            model: default_anthropic_model(),
            max_tokens: default_max_tokens(),
            timeout_ms: default_timeout_ms(),
        }
    }

    /// Validate the section
    ///
    /// # Errors
    ///
    /// Returns a message naming the invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.is_empty() {
            return Err("Anthropic API key must not be empty".to_string());
        }
        if self.max_tokens == 0 {
            return Err("Anthropic max_tokens must be greater than 0".to_string());
        }
        Ok(())
    }
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_anthropic_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_anthropic_model() -> String {
    "claude-3-5-haiku-latest".to_string()
}

const fn default_max_tokens() -> u32 {
    1024
}

const fn default_timeout_ms() -> u64 {
    30000 // 30 seconds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_valid() {
        assert!(ChatConfig::default().validate().is_ok());
    }

    #[test]
    fn openai_defaults() {
        let config = OpenAiChatConfig::new("sk-test");
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.model, "gpt-4o-mini");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn anthropic_defaults() {
        let config = AnthropicConfig::new("ak-test");
        assert_eq!(config.base_url, "https://api.anthropic.com");
        assert_eq!(config.max_tokens, 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_keys_fail_validation() {
        assert!(OpenAiChatConfig::new("").validate().is_err());
        assert!(AnthropicConfig::new("").validate().is_err());
    }

    #[test]
    fn zero_max_tokens_fails_validation() {
        let mut config = AnthropicConfig::new("ak-test");
        config.max_tokens = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_deserializes_from_toml() {
        let toml = r#"
            [openai]
            api_key = "sk-test"
            model = "gpt-4o"

            [anthropic]
            api_key = "ak-test"
            max_tokens = 2048
        "#;

        let config: ChatConfig = toml::from_str(toml).unwrap();

        assert_eq!(config.openai.unwrap().model, "gpt-4o");
        let anthropic = config.anthropic.unwrap();
        assert_eq!(anthropic.max_tokens, 2048);
        assert_eq!(anthropic.model, "claude-3-5-haiku-latest");
    }
}
