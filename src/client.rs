use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, instrument};

use crate::config::Config;
use crate::models::{
    AdjustRequest, GenerateRequest, NewTuningSetup, StoredTuningSetup, StoredVehicle,
    TuningConfiguration, Vehicle,
};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

/// The two tuning calls a session drives.
pub trait TuningApi: Send + Sync {
    fn generate_tuning(
        &self,
        request: &GenerateRequest,
    ) -> impl std::future::Future<Output = Result<TuningConfiguration, ClientError>> + Send;
    fn adjust_tuning(
        &self,
        request: &AdjustRequest,
    ) -> impl std::future::Future<Output = Result<TuningConfiguration, ClientError>> + Send;
}

/// Talks to a running tuning service over HTTP.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[instrument(skip(self, vehicle), fields(brand = %vehicle.brand, model = %vehicle.model))]
    pub async fn create_vehicle(&self, vehicle: &Vehicle) -> Result<StoredVehicle, ClientError> {
        self.post("/vehicles", vehicle).await
    }

    pub async fn list_vehicles(&self) -> Result<Vec<StoredVehicle>, ClientError> {
        self.get("/vehicles", &[]).await
    }

    #[instrument(skip(self, setup), fields(vehicle_id = %setup.vehicle_id))]
    pub async fn save_setup(&self, setup: &NewTuningSetup) -> Result<StoredTuningSetup, ClientError> {
        self.post("/tuning-setups", setup).await
    }

    pub async fn list_setups(
        &self,
        vehicle_id: Option<&str>,
    ) -> Result<Vec<StoredTuningSetup>, ClientError> {
        match vehicle_id {
            Some(id) => self.get("/tuning-setups", &[("vehicleId", id)]).await,
            None => self.get("/tuning-setups", &[]).await,
        }
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);
        let response = self.http.post(&url).json(body).send().await?;
        Self::decode(response).await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);
        let response = self.http.get(&url).query(query).send().await?;
        Self::decode(response).await
    }

    /// Non-2xx responses carry `{ error }`; fall back to the status text.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(Value::as_str).map(String::from))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());

        error!("Tuning service returned {}: {}", status, message);
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

impl TuningApi for ApiClient {
    #[instrument(skip(self, request), fields(brand = %request.car.brand))]
    async fn generate_tuning(
        &self,
        request: &GenerateRequest,
    ) -> Result<TuningConfiguration, ClientError> {
        self.post("/tuning/generate", request).await
    }

    #[instrument(skip(self, request), fields(brand = %request.car.brand))]
    async fn adjust_tuning(
        &self,
        request: &AdjustRequest,
    ) -> Result<TuningConfiguration, ClientError> {
        self.post("/tuning/adjust", request).await
    }
}
