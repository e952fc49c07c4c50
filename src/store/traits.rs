use crate::models::{NewTuningSetup, StoredTuningSetup, StoredVehicle, Vehicle};
use crate::store::StoreError;

/// Vehicles and saved tuning setups. Records are immutable once written;
/// listings come back newest-first.
pub trait TuningStore: Send + Sync {
    fn create_vehicle(
        &self,
        vehicle: Vehicle,
    ) -> impl std::future::Future<Output = Result<StoredVehicle, StoreError>> + Send;
    fn list_vehicles(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<StoredVehicle>, StoreError>> + Send;
    fn get_vehicle(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<StoredVehicle>, StoreError>> + Send;
    fn create_tuning_setup(
        &self,
        setup: NewTuningSetup,
    ) -> impl std::future::Future<Output = Result<StoredTuningSetup, StoreError>> + Send;
    fn list_tuning_setups(
        &self,
        vehicle_id: Option<&str>,
    ) -> impl std::future::Future<Output = Result<Vec<StoredTuningSetup>, StoreError>> + Send;
}
