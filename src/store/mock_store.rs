use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::models::{NewTuningSetup, StoredTuningSetup, StoredVehicle, Vehicle};
use crate::store::{StoreError, TuningStore};

/// In-process store for handler tests. `failing()` rejects every call the
/// way a dropped database connection would.
#[derive(Debug, Clone, Default)]
pub struct MockStore {
    pub vehicles: Arc<Mutex<Vec<StoredVehicle>>>,
    pub setups: Arc<Mutex<Vec<StoredTuningSetup>>>,
    pub write_calls: Arc<Mutex<usize>>,
    fail: bool,
}

impl MockStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail {
            Err(StoreError::SQLite(sqlx::Error::PoolClosed))
        } else {
            Ok(())
        }
    }
}

impl TuningStore for MockStore {
    async fn create_vehicle(&self, vehicle: Vehicle) -> Result<StoredVehicle, StoreError> {
        *self.write_calls.lock().unwrap() += 1;
        self.check()?;

        let mut vehicle = vehicle;
        vehicle.performance.rear_weight = Some(vehicle.performance.rear_weight());
        let stored = StoredVehicle {
            id: format!("vehicle-{}", self.vehicles.lock().unwrap().len() + 1),
            vehicle,
            created_at: Utc::now(),
        };
        self.vehicles.lock().unwrap().insert(0, stored.clone());
        Ok(stored)
    }

    async fn list_vehicles(&self) -> Result<Vec<StoredVehicle>, StoreError> {
        self.check()?;
        Ok(self.vehicles.lock().unwrap().clone())
    }

    async fn get_vehicle(&self, id: &str) -> Result<Option<StoredVehicle>, StoreError> {
        self.check()?;
        Ok(self
            .vehicles
            .lock()
            .unwrap()
            .iter()
            .find(|v| v.id == id)
            .cloned())
    }

    async fn create_tuning_setup(
        &self,
        setup: NewTuningSetup,
    ) -> Result<StoredTuningSetup, StoreError> {
        *self.write_calls.lock().unwrap() += 1;
        self.check()?;

        let Some(vehicle) = self.get_vehicle(&setup.vehicle_id).await? else {
            return Err(StoreError::VehicleNotFound(setup.vehicle_id));
        };
        let drivetrain = vehicle.vehicle.performance.drivetrain;
        let mut setup = setup;
        setup.tuning.differential = setup
            .tuning
            .differential
            .conform_to(drivetrain)
            .ok_or(StoreError::DrivetrainMismatch(drivetrain))?;

        let stored = StoredTuningSetup {
            id: format!("setup-{}", self.setups.lock().unwrap().len() + 1),
            vehicle_id: setup.vehicle_id,
            name: setup.name,
            prompt: setup.prompt,
            setup_type: setup.setup_type,
            explanation: setup.tuning.explanation.clone(),
            tuning: setup.tuning,
            created_at: Utc::now(),
        };
        self.setups.lock().unwrap().insert(0, stored.clone());
        Ok(stored)
    }

    async fn list_tuning_setups(
        &self,
        vehicle_id: Option<&str>,
    ) -> Result<Vec<StoredTuningSetup>, StoreError> {
        self.check()?;
        Ok(self
            .setups
            .lock()
            .unwrap()
            .iter()
            .filter(|s| vehicle_id.is_none_or(|id| s.vehicle_id == id))
            .cloned()
            .collect())
    }
}
