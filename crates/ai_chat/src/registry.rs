//! Provider registry - string-keyed dispatch to chat adapters

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::config::ChatConfig;
use crate::error::ChatError;
use crate::ports::ChatModel;
use crate::providers::{AnthropicChat, OpenAiChat};

/// Lookup table from provider id to chat adapter
#[derive(Default, Clone)]
pub struct ChatRegistry {
    models: HashMap<String, Arc<dyn ChatModel>>,
}

impl std::fmt::Debug for ChatRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatRegistry")
            .field("providers", &self.models.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ChatRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from configuration
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Configuration` if a configured section is invalid
    /// or no section is configured.
    pub fn from_config(config: &ChatConfig) -> Result<Self, ChatError> {
        let mut registry = Self::new();

        if let Some(openai) = &config.openai {
            registry.register(Arc::new(OpenAiChat::new(openai.clone())?));
        }
        if let Some(anthropic) = &config.anthropic {
            registry.register(Arc::new(AnthropicChat::new(anthropic.clone())?));
        }

        if registry.models.is_empty() {
            return Err(ChatError::Configuration(
                "At least one chat provider must be configured".to_string(),
            ));
        }

        info!(
            providers = ?registry.models.keys().collect::<Vec<_>>(),
            "Chat registry initialized"
        );

        Ok(registry)
    }

    /// Register an adapter under its own provider id
    ///
    /// Re-registering an id replaces the previous adapter.
    pub fn register(&mut self, adapter: Arc<dyn ChatModel>) {
        self.models
            .insert(adapter.provider_id().to_string(), adapter);
    }

    /// Resolve a chat adapter by provider id
    ///
    /// # Errors
    ///
    /// Returns `ChatError::ProviderNotFound` for an unknown id.
    pub fn chat(&self, provider: &str) -> Result<Arc<dyn ChatModel>, ChatError> {
        self.models
            .get(provider)
            .cloned()
            .ok_or_else(|| ChatError::ProviderNotFound(provider.to_string()))
    }

    /// Registered provider ids
    #[must_use]
    pub fn providers(&self) -> Vec<&str> {
        self.models.keys().map(String::as_str).collect()
    }
}
