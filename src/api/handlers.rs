use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use serde::Deserialize;
use tracing::{debug, info};
use validator::Validate;

use crate::{
    api::{ApiError, AppState},
    models::{
        AdjustRequest, GenerateRequest, NewTuningSetup, StoredTuningSetup, StoredVehicle,
        TuningConfiguration, Vehicle,
    },
    store::TuningStore,
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupFilter {
    pub vehicle_id: Option<String>,
}

pub async fn generate_tuning<S: TuningStore>(
    State(state): State<AppState<S>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<TuningConfiguration>, ApiError> {
    let Json(request) = payload?;
    debug!("Processing generate request with {} characters", request.prompt.len());

    let tuning = state.tuning.generate(&request).await?;
    Ok(Json(tuning))
}

pub async fn adjust_tuning<S: TuningStore>(
    State(state): State<AppState<S>>,
    payload: Result<Json<AdjustRequest>, JsonRejection>,
) -> Result<Json<TuningConfiguration>, ApiError> {
    let Json(request) = payload?;
    debug!("Processing adjust request with {} characters", request.feedback.len());

    let tuning = state.tuning.adjust(&request).await?;
    Ok(Json(tuning))
}

pub async fn create_vehicle<S: TuningStore>(
    State(state): State<AppState<S>>,
    payload: Result<Json<Vehicle>, JsonRejection>,
) -> Result<Json<StoredVehicle>, ApiError> {
    let Json(vehicle) = payload?;
    vehicle
        .validate()
        .map_err(|e| ApiError::invalid("Geçersiz araç verileri", &e))?;

    let stored = state.store.create_vehicle(vehicle).await?;
    info!("Created vehicle {} ({} {})", stored.id, stored.vehicle.brand, stored.vehicle.model);
    Ok(Json(stored))
}

pub async fn list_vehicles<S: TuningStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<StoredVehicle>>, ApiError> {
    let vehicles = state
        .store
        .list_vehicles()
        .await
        .map_err(ApiError::load_failed)?;
    Ok(Json(vehicles))
}

pub async fn create_tuning_setup<S: TuningStore>(
    State(state): State<AppState<S>>,
    payload: Result<Json<NewTuningSetup>, JsonRejection>,
) -> Result<Json<StoredTuningSetup>, ApiError> {
    let Json(setup) = payload?;
    setup
        .validate()
        .map_err(|e| ApiError::invalid("Geçersiz setup verileri", &e))?;

    let stored = state.store.create_tuning_setup(setup).await?;
    info!("Saved tuning setup {} for vehicle {}", stored.id, stored.vehicle_id);
    Ok(Json(stored))
}

pub async fn list_tuning_setups<S: TuningStore>(
    State(state): State<AppState<S>>,
    filter: Result<Query<SetupFilter>, QueryRejection>,
) -> Result<Json<Vec<StoredTuningSetup>>, ApiError> {
    let Query(filter) = filter?;
    let setups = state
        .store
        .list_tuning_setups(filter.vehicle_id.as_deref())
        .await
        .map_err(ApiError::load_failed)?;
    Ok(Json(setups))
}
