use serde::Deserialize;

pub mod builder;
pub mod extractor;
pub mod loader;
pub mod provider_factory;
pub mod tuning_provider;

pub const GENERATE_PROFILE: &str = "generate";
pub const ADJUST_PROFILE: &str = "adjust";

/// A system persona plus the model settings it runs with.
#[derive(Debug, Clone)]
pub struct PromptProfile {
    pub name: String,
    pub system_prompt: String,
    pub config: PromptConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptConfig {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}
