use std::sync::Arc;

use axum::{
    Json, Router,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::error;
use validator::ValidationErrors;

use crate::{
    prompts::tuning_provider::{TuningError, TuningProvider},
    store::{StoreError, TuningStore},
};

pub mod handlers;

pub const MODEL_UNAVAILABLE_MESSAGE: &str =
    "Yapay zeka servisine şu anda ulaşılamıyor. Lütfen daha sonra tekrar deneyin.";
pub const GENERATION_FAILED_MESSAGE: &str = "Tuning oluşturulamadı. Lütfen tekrar deneyin.";
pub const SAVE_FAILED_MESSAGE: &str = "Kayıt işlemi sırasında bir hata oluştu.";
pub const LOAD_FAILED_MESSAGE: &str = "Kayıtlar yüklenirken bir hata oluştu.";

/// Shared, read-only handles for every request.
pub struct AppState<S> {
    pub store: Arc<S>,
    pub tuning: Arc<TuningProvider>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            tuning: self.tuning.clone(),
        }
    }
}

pub fn router<S: TuningStore + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/tuning/generate", post(handlers::generate_tuning::<S>))
        .route("/tuning/adjust", post(handlers::adjust_tuning::<S>))
        .route(
            "/vehicles",
            post(handlers::create_vehicle::<S>).get(handlers::list_vehicles::<S>),
        )
        .route(
            "/tuning-setups",
            post(handlers::create_tuning_setup::<S>).get(handlers::list_tuning_setups::<S>),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Every failure leaves the service as `{ error, details? }`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest {
        message: String,
        details: Option<Value>,
    },
    Internal {
        message: &'static str,
    },
}

impl ApiError {
    pub fn invalid(message: &str, errors: &ValidationErrors) -> Self {
        ApiError::BadRequest {
            message: message.to_string(),
            details: serde_json::to_value(errors).ok(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::BadRequest { message, details } => ErrorBody {
                error: message,
                details,
            },
            ApiError::Internal { message } => ErrorBody {
                error: message.to_string(),
                details: None,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest {
            message: "Eksik veya hatalı istek verileri".to_string(),
            details: Some(json!({ "reason": rejection.body_text() })),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest {
            message: "Geçersiz sorgu parametreleri".to_string(),
            details: Some(json!({ "reason": rejection.body_text() })),
        }
    }
}

impl From<TuningError> for ApiError {
    fn from(e: TuningError) -> Self {
        match e {
            TuningError::Validation(errors) => {
                ApiError::invalid("Araç bilgileri veya istek metni geçersiz", &errors)
            }
            TuningError::ModelUnavailable(_) | TuningError::EmptyResponse => {
                error!("Tuning request failed upstream: {}", e);
                ApiError::Internal {
                    message: MODEL_UNAVAILABLE_MESSAGE,
                }
            }
            other => {
                error!("Tuning request failed: {}", other);
                ApiError::Internal {
                    message: GENERATION_FAILED_MESSAGE,
                }
            }
        }
    }
}

impl ApiError {
    /// Failures on listing routes, where nothing was being saved.
    pub fn load_failed(e: StoreError) -> Self {
        error!("Persistence read failure: {}", e);
        ApiError::Internal {
            message: LOAD_FAILED_MESSAGE,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::VehicleNotFound(id) => ApiError::BadRequest {
                message: "Araç bulunamadı".to_string(),
                details: Some(json!({ "vehicleId": id })),
            },
            StoreError::DrivetrainMismatch(drivetrain) => ApiError::BadRequest {
                message: "Diferansiyel ayarları aracın çekiş sistemine uymuyor".to_string(),
                details: Some(json!({ "drivetrain": drivetrain })),
            },
            other => {
                error!("Persistence failure: {}", other);
                ApiError::Internal {
                    message: SAVE_FAILED_MESSAGE,
                }
            }
        }
    }
}
