use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};
use validator::{Validate, ValidationErrors};

use crate::{
    llm_providers::{LLMError, LLMProvider},
    models::{AdjustRequest, Drivetrain, GenerateRequest, TuningConfiguration},
    prompts::{
        builder::{build_adjustment_prompt, build_generation_prompt},
        extractor::{self, ExtractError},
    },
};

#[derive(Error, Debug)]
pub enum TuningError {
    #[error("ValidationError: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("ModelUnavailable: {0}")]
    ModelUnavailable(LLMError),

    #[error("EmptyResponse: model returned no text")]
    EmptyResponse,

    #[error("NoJsonFound: model output contained no JSON object")]
    NoJsonFound,

    #[error("MalformedJson: {0}")]
    MalformedJson(serde_json::Error),

    #[error("InvalidTuning: differential does not fit a {0} drivetrain")]
    DrivetrainMismatch(Drivetrain),

    #[error("OutOfRange: {0}")]
    OutOfRange(ValidationErrors),

    #[error("Prompt serialization failed: {0}")]
    Prompt(serde_json::Error),
}

impl TuningError {
    /// Whether the caller sent something unusable, as opposed to a failure
    /// further down the pipeline.
    pub fn is_client_error(&self) -> bool {
        matches!(self, TuningError::Validation(_))
    }
}

impl From<LLMError> for TuningError {
    fn from(e: LLMError) -> Self {
        match e {
            LLMError::EmptyResponse => TuningError::EmptyResponse,
            other => TuningError::ModelUnavailable(other),
        }
    }
}

impl From<ExtractError> for TuningError {
    fn from(e: ExtractError) -> Self {
        match e {
            ExtractError::NoJsonFound => TuningError::NoJsonFound,
            ExtractError::MalformedJson(e) => TuningError::MalformedJson(e),
        }
    }
}

/// Runs a tuning request through prompt building, the model and extraction.
///
/// Each persona gets its own provider: `generator` for fresh sheets,
/// `adjuster` for feedback-driven refinement.
pub struct TuningProvider {
    generator: Arc<dyn LLMProvider>,
    adjuster: Arc<dyn LLMProvider>,
}

impl TuningProvider {
    pub fn new(generator: Arc<dyn LLMProvider>, adjuster: Arc<dyn LLMProvider>) -> Self {
        Self {
            generator,
            adjuster,
        }
    }

    #[instrument(skip(self, request), fields(brand = %request.car.brand, model = %request.car.model))]
    pub async fn generate(
        &self,
        request: &GenerateRequest,
    ) -> Result<TuningConfiguration, TuningError> {
        request.validate()?;

        let prompt = build_generation_prompt(&request.car, &request.prompt, request.setup_type);
        debug!("Built generation prompt with {} characters", prompt.len());

        let raw = self.generator.query(&prompt).await?;
        let tuning = ingest(&raw, request.car.performance.drivetrain)?;
        info!("Generated tuning for {} {}", request.car.brand, request.car.model);
        Ok(tuning)
    }

    #[instrument(skip(self, request), fields(brand = %request.car.brand, model = %request.car.model))]
    pub async fn adjust(&self, request: &AdjustRequest) -> Result<TuningConfiguration, TuningError> {
        request.validate()?;

        let prompt = build_adjustment_prompt(&request.car, &request.current_setup, &request.feedback)
            .map_err(TuningError::Prompt)?;
        debug!("Built adjustment prompt with {} characters", prompt.len());

        let raw = self.adjuster.query(&prompt).await?;
        let tuning = ingest(&raw, request.car.performance.drivetrain)?;
        info!("Adjusted tuning for {} {}", request.car.brand, request.car.model);
        Ok(tuning)
    }
}

/// Extract, fit to the drivetrain and range-check a model reply.
fn ingest(raw: &str, drivetrain: Drivetrain) -> Result<TuningConfiguration, TuningError> {
    let mut tuning = extractor::parse_tuning(raw).map_err(|e| {
        error!("Could not extract tuning from model output: {}\n{}", e, raw);
        TuningError::from(e)
    })?;

    let parsed_as = tuning.differential.drivetrain();
    tuning.differential = tuning.differential.conform_to(drivetrain).ok_or_else(|| {
        error!(
            "Model returned a {} differential for a {} vehicle",
            parsed_as, drivetrain
        );
        TuningError::DrivetrainMismatch(drivetrain)
    })?;
    if parsed_as != drivetrain {
        warn!("Dropped {} differential fields for a {} vehicle", parsed_as, drivetrain);
    }

    tuning.validate().map_err(|e| {
        error!("Model output out of range: {}", e);
        TuningError::OutOfRange(e)
    })?;

    Ok(tuning)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_providers::mock::MockLLMProvider;
    use crate::models::tuning::tests::{RWD_TUNING_JSON, rwd_tuning};
    use crate::models::vehicle::tests::supra;

    fn provider(generator: &MockLLMProvider, adjuster: &MockLLMProvider) -> TuningProvider {
        TuningProvider::new(Arc::new(generator.clone()), Arc::new(adjuster.clone()))
    }

    fn generate_request() -> GenerateRequest {
        GenerateRequest {
            car: supra(),
            prompt: "Stable setup for wet tarmac".into(),
            setup_type: None,
        }
    }

    #[tokio::test]
    async fn generate_returns_parsed_tuning() {
        let generator = MockLLMProvider::new(format!("Here you go:\n{RWD_TUNING_JSON}\nEnjoy!"));
        let adjuster = MockLLMProvider::unavailable();
        let tuning = provider(&generator, &adjuster)
            .generate(&generate_request())
            .await
            .unwrap();

        assert_eq!(tuning, rwd_tuning());
        assert_eq!(generator.call_count(), 1);
        assert_eq!(adjuster.call_count(), 0);

        let sent = generator.last_input().unwrap();
        assert!(sent.contains("Marka: Toyota"));
        assert!(sent.contains("Çekiş Sistemi: RWD"));
    }

    #[tokio::test]
    async fn invalid_weight_split_is_rejected_before_model_call() {
        let generator = MockLLMProvider::new(RWD_TUNING_JSON);
        let mut request = generate_request();
        request.car.performance.front_weight = 60;
        request.car.performance.rear_weight = Some(60);

        let result = provider(&generator, &generator).generate(&request).await;
        assert!(matches!(result, Err(TuningError::Validation(_))));
        assert!(result.unwrap_err().is_client_error());
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn short_prompt_is_rejected() {
        let generator = MockLLMProvider::new(RWD_TUNING_JSON);
        let mut request = generate_request();
        request.prompt = "hızlı".into();

        let result = provider(&generator, &generator).generate(&request).await;
        assert!(matches!(result, Err(TuningError::Validation(_))));
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn model_failures_map_to_taxonomy() {
        let unavailable = MockLLMProvider::unavailable();
        let result = provider(&unavailable, &unavailable)
            .generate(&generate_request())
            .await;
        assert!(matches!(result, Err(TuningError::ModelUnavailable(_))));

        let empty = MockLLMProvider::empty();
        let result = provider(&empty, &empty).generate(&generate_request()).await;
        assert!(matches!(result, Err(TuningError::EmptyResponse)));

        let prose = MockLLMProvider::new("Bu araç için öneri veremiyorum.");
        let result = provider(&prose, &prose).generate(&generate_request()).await;
        assert!(matches!(result, Err(TuningError::NoJsonFound)));

        let broken = MockLLMProvider::new("{\"tires\": {\"frontPressure\": 2.1");
        let result = provider(&broken, &broken).generate(&generate_request()).await;
        assert!(matches!(result, Err(TuningError::NoJsonFound)));

        let partial = MockLLMProvider::new("{\"tires\": {\"frontPressure\": 2.1}}");
        let result = provider(&partial, &partial).generate(&generate_request()).await;
        assert!(matches!(result, Err(TuningError::MalformedJson(_))));
        assert!(!result.unwrap_err().is_client_error());
    }

    #[tokio::test]
    async fn out_of_range_reply_is_rejected() {
        let reply = RWD_TUNING_JSON.replace("\"frontPressure\": 2.1", "\"frontPressure\": 9.0");
        let generator = MockLLMProvider::new(reply);
        let result = provider(&generator, &generator)
            .generate(&generate_request())
            .await;
        assert!(matches!(result, Err(TuningError::OutOfRange(_))));
    }

    #[tokio::test]
    async fn integral_float_levels_are_accepted_and_range_checked() {
        let reply = RWD_TUNING_JSON.replace("\"turboLevel\": 0", "\"turboLevel\": 2.0");
        let generator = MockLLMProvider::new(reply);
        let tuning = provider(&generator, &generator)
            .generate(&generate_request())
            .await
            .unwrap();
        assert_eq!(tuning.engine.and_then(|e| e.turbo_level), Some(2));

        let reply = RWD_TUNING_JSON.replace("\"turboLevel\": 0", "\"turboLevel\": 7.0");
        let generator = MockLLMProvider::new(reply);
        let result = provider(&generator, &generator)
            .generate(&generate_request())
            .await;
        assert!(matches!(result, Err(TuningError::OutOfRange(_))));
    }

    #[tokio::test]
    async fn extra_differential_fields_are_dropped_for_rwd() {
        let reply = RWD_TUNING_JSON.replace(
            "\"differential\": { \"rearAccel\": 45, \"rearDecel\": 20 }",
            "\"differential\": { \"frontAccel\": 10, \"frontDecel\": 5, \"rearAccel\": 45, \"rearDecel\": 20, \"center\": 60 }",
        );
        let generator = MockLLMProvider::new(reply);
        let tuning = provider(&generator, &generator)
            .generate(&generate_request())
            .await
            .unwrap();
        assert_eq!(tuning.differential.drivetrain(), Drivetrain::Rwd);
    }

    #[tokio::test]
    async fn missing_differential_fields_for_awd_are_rejected() {
        let generator = MockLLMProvider::new(RWD_TUNING_JSON);
        let mut request = generate_request();
        request.car.performance.drivetrain = Drivetrain::Awd;

        let result = provider(&generator, &generator).generate(&request).await;
        assert!(matches!(
            result,
            Err(TuningError::DrivetrainMismatch(Drivetrain::Awd))
        ));
    }

    #[tokio::test]
    async fn adjust_uses_adjuster_persona_and_embeds_current_setup() {
        let generator = MockLLMProvider::unavailable();
        let adjuster = MockLLMProvider::new(RWD_TUNING_JSON);
        let request = AdjustRequest {
            car: supra(),
            current_setup: rwd_tuning(),
            feedback: "Arka taraf virajda kayıyor".into(),
        };

        let tuning = provider(&generator, &adjuster).adjust(&request).await.unwrap();
        assert_eq!(tuning, rwd_tuning());
        assert_eq!(generator.call_count(), 0);
        assert_eq!(adjuster.call_count(), 1);

        let sent = adjuster.last_input().unwrap();
        assert!(sent.contains("Mevcut Tuning Ayarları"));
        assert!(sent.contains("Kullanıcı Geri Bildirimi: Arka taraf virajda kayıyor"));
    }
}
