use std::sync::Arc;

use tracing::info;

use crate::{
    llm_providers::{LLMProvider, anthropic::AnthropicProvider},
    prompts::PromptProfile,
};

/// Builds one provider per persona, falling back to the service-wide
/// provider and model when a profile does not name its own.
pub struct ProviderFactory {
    pub default_provider: String,
    pub default_model: String,
    pub api_key: String,
    pub base_url: String,
}

impl ProviderFactory {
    pub fn build_provider(&self, profile: &PromptProfile) -> Result<Arc<dyn LLMProvider>, String> {
        let provider_name = profile
            .config
            .provider
            .as_deref()
            .unwrap_or(&self.default_provider);
        let model = profile
            .config
            .model
            .clone()
            .unwrap_or_else(|| self.default_model.clone());

        let provider: Arc<dyn LLMProvider> = match provider_name {
            "anthropic" => {
                let mut provider = AnthropicProvider::new(
                    self.api_key.clone(),
                    model,
                    profile.system_prompt.clone(),
                )
                .with_base_url(&self.base_url);
                if let Some(temperature) = profile.config.temperature {
                    provider = provider.with_temperature(temperature);
                }
                if let Some(max_output_tokens) = profile.config.max_output_tokens {
                    provider = provider.with_max_tokens(max_output_tokens);
                }
                info!(
                    "Profile '{}' uses Anthropic model {}",
                    profile.name,
                    provider.model()
                );
                Arc::new(provider)
            }
            other => {
                return Err(format!(
                    "Unsupported LLM provider '{}' in profile '{}'",
                    other, profile.name
                ));
            }
        };

        Ok(provider)
    }
}
