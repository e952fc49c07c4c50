use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::{SetupType, TuningConfiguration, Vehicle};

const MIN_TEXT_CHARS: usize = 10;

/// Surrounding whitespace does not count toward the minimum.
fn require_text(text: &str, code: &'static str, message: &'static str) -> Result<(), ValidationError> {
    if text.trim().chars().count() >= MIN_TEXT_CHARS {
        return Ok(());
    }
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    Err(err)
}

fn validate_prompt_text(prompt: &str) -> Result<(), ValidationError> {
    require_text(prompt, "prompt_length", "Tuning açıklaması en az 10 karakter olmalıdır")
}

fn validate_feedback_text(feedback: &str) -> Result<(), ValidationError> {
    require_text(feedback, "feedback_length", "Geri bildirim en az 10 karakter olmalıdır")
}

/// Body of `POST /tuning/generate`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[validate(nested)]
    pub car: Vehicle,
    #[validate(custom(function = "validate_prompt_text"))]
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup_type: Option<SetupType>,
}

/// Body of `POST /tuning/adjust`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdjustRequest {
    #[validate(nested)]
    pub car: Vehicle,
    pub current_setup: TuningConfiguration,
    #[validate(custom(function = "validate_feedback_text"))]
    pub feedback: String,
}
