use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{SetupType, TuningConfiguration};

/// A tuning sheet the user chose to keep, as submitted for saving.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewTuningSetup {
    #[validate(length(min = 1))]
    pub vehicle_id: String,
    #[validate(length(min = 1, message = "Setup ismi gereklidir"))]
    pub name: String,
    #[validate(length(min = 1))]
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup_type: Option<SetupType>,
    #[validate(nested)]
    pub tuning: TuningConfiguration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTuningSetup {
    pub id: String,
    pub vehicle_id: String,
    pub name: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup_type: Option<SetupType>,
    pub tuning: TuningConfiguration,
    pub explanation: String,
    pub created_at: DateTime<Utc>,
}
